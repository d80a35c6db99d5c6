use dnodes::error::{ApiError, IngestError, ProtocolError, ValidationError};
use dnodes::{
    feed, ingest, lines_from_reader, DnodeStore, GrammarKind, KeyValueGrammar, MemoryDnodeStore,
    ZdbGrammar,
};

const ZDB_DUMP: &[u8] = b"\
Dataset tank/home [ZPL], ID 54, cr_txg 1, 24.0K, 7 objects, rootbp ...

    Object  lvl   iblk   dblk  dsize  dnsize  lsize   %full  type
         0    6   128K    16K  9.00K     512    32K    6.25  DMU dnode
\tdnode flags: USED_BYTES
\tdnode maxblkid: 1

    Object  lvl   iblk   dblk  dsize  dnsize  lsize   %full  type
        -1    1   128K    512      0     512    512  100.00  ZFS user/group/project used
\tdnode flags: USED_BYTES USERUSED_ACCOUNTED
\tdnode maxblkid: 9

    Object  lvl   iblk   dblk  dsize  dnsize  lsize   %full  type
        34    1   128K  1.50K     4K     512  1.50K  100.00  ZFS directory
                                               176   bonus  System attributes
\tdnode flags: USED_BYTES USERUSED_ACCOUNTED USEROBJUSED_ACCOUNTED
\tdnode maxblkid: 0
\tpath\t/home/alice
\tuid     1000
\tgid     1000

    Object  lvl   iblk   dblk  dsize  dnsize  lsize   %full  type
        35    2   128K   128K   640K     512  1.25M   80.00  ZFS plain file
\tdnode flags: USED_BYTES USERUSED_ACCOUNTED
\tdnode maxblkid: 9
\tpath\t/home/alice/notes  with  spaces.txt
";

#[test]
fn zdb_dump_is_persisted_in_order() {
    let store = MemoryDnodeStore::new();
    let report = ingest(lines_from_reader(ZDB_DUMP), ZdbGrammar::new(), &store).unwrap();

    assert_eq!(report.grammar, "zdb");
    assert_eq!(report.records, 3);
    assert_eq!(store.count().unwrap(), 3);

    let meta = store.get(0).unwrap().unwrap();
    assert_eq!(meta.dnode_type(), "DMU dnode");
    assert_eq!(meta.full(), 6.25);
    assert_eq!(meta.maxblkid(), Some(1));
    assert!(meta.path().is_none());

    let dir = store.find_by_path(b"/home/alice").unwrap().unwrap();
    assert_eq!(dir.inode(), 34);
    assert_eq!(
        dir.flags(),
        Some("USED_BYTES USERUSED_ACCOUNTED USEROBJUSED_ACCOUNTED")
    );

    let file = store.get(35).unwrap().unwrap();
    assert_eq!(
        file.path().unwrap().as_bytes(),
        b"/home/alice/notes  with  spaces.txt"
    );
    assert_eq!(file.maxblkid(), Some(9));
}

#[test]
fn special_object_properties_do_not_leak_into_open_record() {
    let store = MemoryDnodeStore::new();
    ingest(lines_from_reader(ZDB_DUMP), ZdbGrammar::new(), &store).unwrap();
    // Object 0 is still open while the -1 block is read.
    let meta = store.get(0).unwrap().unwrap();
    assert_eq!(meta.flags(), Some("USED_BYTES"));
    assert_eq!(meta.maxblkid(), Some(1));
}

#[test]
fn grammar_kind_builds_a_working_grammar() {
    let store = MemoryDnodeStore::new();
    let report = ingest(
        lines_from_reader(ZDB_DUMP),
        GrammarKind::Zdb.build(),
        &store,
    )
    .unwrap();
    assert_eq!(report.records, 3);
}

#[test]
fn records_before_a_bad_value_stay_persisted() {
    let input: &[u8] = b"\
inode=1 full=10.0 type=ZFS directory
path=/a
inode=2 full=20.0 type=ZFS plain file
maxblkid=lots
inode=3 full=30.0 type=ZFS plain file
";
    let store = MemoryDnodeStore::new();
    let err = ingest(lines_from_reader(input), KeyValueGrammar::new(), &store).unwrap_err();

    match err {
        ApiError::Ingest(IngestError::Validation { line, source }) => {
            assert_eq!(line, 4);
            assert!(matches!(source, ValidationError::InvalidInteger { .. }));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(store.count().unwrap(), 1);
    assert!(store.get(1).unwrap().is_some());
    assert!(store.get(3).unwrap().is_none());
}

#[test]
fn property_before_any_boundary_is_a_protocol_error() {
    let input: &[u8] = b"path=/orphan\ninode=1 full=1.0 type=a\n";
    let results: Vec<_> = feed(lines_from_reader(input), KeyValueGrammar::new()).collect();
    assert_eq!(results.len(), 1);
    assert!(matches!(
        results[0],
        Err(IngestError::Protocol(ProtocolError::PropertyBeforeBoundary { line: 1 }))
    ));
}

#[test]
fn empty_input_yields_nothing() {
    let store = MemoryDnodeStore::new();
    let report = ingest(lines_from_reader(&b""[..]), ZdbGrammar::new(), &store).unwrap();
    assert_eq!(report.records, 0);
    assert_eq!(report.lines, 0);
    assert_eq!(store.count().unwrap(), 0);
}
