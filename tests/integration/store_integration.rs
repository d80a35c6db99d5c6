use dnodes::{Dnode, DnodeStore, MemoryDnodeStore, SledDnodeStore};
use tempfile::TempDir;

fn dnode(inode: &str, path: Option<&[u8]>) -> Dnode {
    let mut dn = Dnode::new(inode, "100.00", "ZFS plain file").unwrap();
    if let Some(path) = path {
        dn.set_path(path).unwrap();
    }
    dn
}

#[test]
fn records_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("store");

    {
        let store = SledDnodeStore::open(&store_path).unwrap();
        store.persist(dnode("2", Some(&b"/b"[..]))).unwrap();
        store.persist(dnode("1", Some(&b"/a\xff"[..]))).unwrap();
        store.persist(dnode("3", None)).unwrap();
        store.flush().unwrap();
    }

    let store = SledDnodeStore::open(&store_path).unwrap();
    assert_eq!(store.count().unwrap(), 3);
    let inodes: Vec<u64> = store
        .list_all()
        .unwrap()
        .iter()
        .map(Dnode::inode)
        .collect();
    assert_eq!(inodes, vec![1, 2, 3]);
    assert_eq!(store.find_by_path(b"/a\xff").unwrap().unwrap().inode(), 1);
}

#[test]
fn inode_order_is_numeric_not_lexical() {
    let store = SledDnodeStore::temporary().unwrap();
    for inode in ["10", "9", "256", "1"] {
        store.persist(dnode(inode, None)).unwrap();
    }
    let inodes: Vec<u64> = store
        .list_all()
        .unwrap()
        .iter()
        .map(Dnode::inode)
        .collect();
    assert_eq!(inodes, vec![1, 9, 10, 256]);
}

#[test]
fn persisting_same_inode_replaces_record_and_path_index() {
    let store = SledDnodeStore::temporary().unwrap();
    store.persist(dnode("5", Some(&b"/old"[..]))).unwrap();
    store.persist(dnode("5", Some(&b"/new"[..]))).unwrap();

    assert_eq!(store.count().unwrap(), 1);
    assert!(store.find_by_path(b"/old").unwrap().is_none());
    assert_eq!(store.find_by_path(b"/new").unwrap().unwrap().inode(), 5);
}

#[test]
fn path_left_by_one_inode_stays_with_the_other() {
    let store = SledDnodeStore::temporary().unwrap();
    store.persist(dnode("5", Some(&b"/shared"[..]))).unwrap();
    store.persist(dnode("6", Some(&b"/shared"[..]))).unwrap();
    // Replacing inode 5 must not drop the mapping now owned by 6.
    store.persist(dnode("5", Some(&b"/five"[..]))).unwrap();

    assert_eq!(store.find_by_path(b"/shared").unwrap().unwrap().inode(), 6);
    assert_eq!(store.find_by_path(b"/five").unwrap().unwrap().inode(), 5);
}

#[test]
fn sled_and_memory_stores_agree_on_shared_paths() {
    let temp_dir = TempDir::new().unwrap();
    let sled_store = SledDnodeStore::open(&temp_dir.path().join("store")).unwrap();
    let memory_store = MemoryDnodeStore::new();
    let stores: [&dyn DnodeStore; 2] = [&sled_store, &memory_store];

    for store in stores {
        store.persist(dnode("5", Some(&b"/shared"[..]))).unwrap();
        store.persist(dnode("6", Some(&b"/shared"[..]))).unwrap();
        store.persist(dnode("6", Some(&b"/other"[..]))).unwrap();
    }

    for store in stores {
        assert_eq!(store.get(5).unwrap().unwrap().path().unwrap().as_bytes(), b"/shared");
        assert_eq!(store.find_by_path(b"/shared").unwrap().unwrap().inode(), 5);
        assert_eq!(store.find_by_path(b"/other").unwrap().unwrap().inode(), 6);
    }
}
