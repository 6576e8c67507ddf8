use bucket_storage::BucketStorage;

fn main() {
    let mut storage = BucketStorage::with_block_capacity(4).unwrap();
    let cursors = ['a', 'b', 'c', 'd', 'e', 'f']
        .iter()
        .map(|&c| storage.insert(c))
        .collect::<Vec<_>>();
    println!("{:?}", storage);

    storage.erase(cursors[1]);
    storage.erase(cursors[4]);
    println!("{:?}", storage);

    // Takes the slot of 'e', then the one of 'b'.
    storage.insert('x');
    println!("{:?}", storage);
    storage.insert('y');
    println!("{:?}", storage);
}
