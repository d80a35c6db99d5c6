use dnodes::{feed, lines_from_reader, Dnode, DnodePath, KeyValueGrammar, ZdbGrammar};
use proptest::prelude::*;

fn path_byte() -> impl Strategy<Value = u8> {
    any::<u8>().prop_filter("line-safe, non-NUL", |b| !matches!(b, 0 | b'\n'))
}

fn zdb_block(path: &[u8]) -> Vec<Vec<u8>> {
    let mut path_line = b"\tpath\t".to_vec();
    path_line.extend_from_slice(path);
    vec![
        b"        12    1   128K    512    512     512    512  100.00  ZFS plain file".to_vec(),
        path_line,
    ]
}

proptest! {
    #[test]
    fn path_reads_back_identical_bytes(path in proptest::collection::vec(1u8..=255, 0..10000)) {
        let mut dnode = Dnode::new("1", "100.0", "ZFS plain file").unwrap();
        dnode.set_path(&path).unwrap();
        prop_assert_eq!(dnode.path().unwrap().as_bytes(), &path[..]);
        prop_assert_eq!(DnodePath::new(&path).unwrap().into_bytes(), path);
    }

    #[test]
    fn zdb_path_bytes_survive_ingest(path in proptest::collection::vec(path_byte(), 1..512)) {
        let out: Vec<Dnode> = feed(zdb_block(&path), ZdbGrammar::new())
            .collect::<Result<_, _>>()
            .unwrap();
        prop_assert_eq!(out.len(), 1);
        prop_assert_eq!(out[0].path().unwrap().as_bytes(), &path[..]);
    }

    #[test]
    fn key_value_path_bytes_survive_reader_split(path in proptest::collection::vec(path_byte(), 1..512)) {
        let mut input = b"inode=12 full=100.00 type=ZFS plain file\npath=".to_vec();
        input.extend_from_slice(&path);
        input.extend_from_slice(b"\r\n");
        let out: Vec<Dnode> = feed(lines_from_reader(&input[..]), KeyValueGrammar::new())
            .collect::<Result<_, _>>()
            .unwrap();
        let mut expected = path.clone();
        expected.push(b'\r');
        prop_assert_eq!(out[0].path().unwrap().as_bytes(), &expected[..]);
    }

    #[test]
    fn stored_encoding_keeps_path_bytes(path in proptest::collection::vec(1u8..=255, 0..2048)) {
        let mut dnode = Dnode::new("7", "50.00", "ZFS plain file").unwrap();
        dnode.set_path(&path).unwrap();
        let encoded = bincode::serialize(&dnode).unwrap();
        let decoded: Dnode = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded.path().unwrap().as_bytes(), &path[..]);
        prop_assert_eq!(decoded, dnode);
    }

    #[test]
    fn nul_anywhere_is_rejected(
        head in proptest::collection::vec(1u8..=255, 0..64),
        tail in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let mut raw = head.clone();
        raw.push(0);
        raw.extend_from_slice(&tail);
        prop_assert!(DnodePath::new(&raw).is_err());

        let mut dnode = Dnode::new("7", "50.00", "ZFS plain file").unwrap();
        dnode.set_path(&head).unwrap();
        prop_assert!(dnode.set_path(&raw).is_err());
        prop_assert_eq!(dnode.path().unwrap().as_bytes(), &head[..]);
    }
}

#[cfg(unix)]
#[test]
fn os_path_conversion_is_lossless() {
    use std::os::unix::ffi::OsStrExt;
    let path = DnodePath::new(b"/data/\xff\xfe/caf\xc3\xa9").unwrap();
    assert_eq!(path.to_path_buf().as_os_str().as_bytes(), path.as_bytes());
}
