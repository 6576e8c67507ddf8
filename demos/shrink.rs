use bucket_storage::BucketStorage;


fn main() {
    let mut storage = BucketStorage::with_block_capacity(3).unwrap();
    storage.insert('a');
    let b = storage.insert('b');
    let c = storage.insert('c');
    storage.insert('d');
    storage.insert('e');
    let f = storage.insert('f');
    storage.insert('g');

    storage.erase(b);
    storage.erase(c);
    storage.erase(f);


    println!("--- before shrink_to_fit():");
    println!("{:?}", storage);
    println!("blocks:   {}", storage.num_blocks());
    println!("capacity: {}", storage.capacity());

    storage.shrink_to_fit();
    println!("--- after shrink_to_fit():");
    println!("{:?}", storage);
    println!("blocks:   {}", storage.num_blocks());
    println!("capacity: {}", storage.capacity());

    // Nothing is reused anymore, so this goes to the end.
    storage.insert('h');
    println!("{:?}", storage);
}
