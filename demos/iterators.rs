use bucket_storage::BucketStorage;


fn main() {
    let mut storage = BucketStorage::with_block_capacity(4).unwrap();
    let cursors = (0..6).map(|i| storage.insert(i)).collect::<Vec<_>>();
    storage.erase(cursors[1]);
    storage.erase(cursors[4]);

    for e in &storage {
        println!("{:?}", e);
    }

    println!("-------");
    for e in storage.iter_mut() {
        *e += 1;
        println!("{:?}", e);
    }

    println!("-------");
    let mut at = storage.end();
    loop {
        at = storage.retreat(at);
        match storage.get(at) {
            Some(e) => println!("{} -> {:?}", at.logical_position(), e),
            None => break,
        }
    }

    // BucketStorage implements `FromIterator`
    let storage: BucketStorage<_> = (1..9).collect();
    println!("{:?}", storage);
}
