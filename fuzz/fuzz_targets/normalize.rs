#![no_main]

use libfuzzer_sys::fuzz_target;
use na_byml::{BigEndian, Byml, ByteOrder, LittleEndian, normalize};

fn read_all<O: ByteOrder>(data: &[u8]) {
    let Ok(doc) = Byml::<O>::new(data) else {
        return;
    };
    if let Ok(Some(node)) = doc.root()
        && let Some(map) = node.as_hash_map32()
    {
        let _ = map.iter().filter(Result::is_ok).count();
        let _ = map.get(map.len());
    }
    let _ = serde_json::to_string(&doc);
    let _ = doc.to_yaml();
}

// Overlapping payloads make a second pass order dependent, so only
// panics are checked here.
fuzz_target!(|data: &[u8]| {
    read_all::<BigEndian>(data);
    read_all::<LittleEndian>(data);

    let mut big = data.to_vec();
    if normalize::<BigEndian>(&mut big).is_ok() {
        read_all::<BigEndian>(&big);
    }

    let mut little = data.to_vec();
    if normalize::<LittleEndian>(&mut little).is_ok() {
        read_all::<LittleEndian>(&little);
    }
});
