use bucket_storage::BucketStorage;

/// A dummy type which prints its character when dropped.
struct EchoDrop(pub char);

impl Drop for EchoDrop {
    fn drop(&mut self) {
        println!("I was dropped: {}", self.0);
    }
}

fn main() {
    let mut storage = BucketStorage::with_block_capacity(2).unwrap();
    storage.insert(EchoDrop('a'));
    let b = storage.insert(EchoDrop('b'));
    let c = storage.insert(EchoDrop('c'));
    storage.insert(EchoDrop('d'));

    {
        // Removing it from the storage shouldn't drop the value: it is moved
        // out of the storage into this function.
        println!("--- removing 'b' (nothing should be dropped!) ...");
        let _b = storage.remove(b);

        // But now the value goes out of scope and it should be dropped now.
        println!("--- letting 'b' go out of scope (it should be dropped now!) ...");
    }

    // Erasing drops right away.
    println!("--- erasing 'c' (it should be dropped now!) ...");
    storage.erase(c);

    // The storage will be dropped at the end of this function and should drop
    // all elements inside it which haven't been removed yet ('a' and 'd').
    println!("--- letting the storage go out of scope (it should drop 'a' and 'd'!) ...");
}
