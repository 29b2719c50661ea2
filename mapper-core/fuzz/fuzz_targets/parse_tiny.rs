#![no_main]

use libfuzzer_sys::fuzz_target;
use mapper_core::parser::parse_str;
use mapper_core::remapper::IdentifierKind;

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);
    let (table, stats) = parse_str(&input);

    // Later records overwrite earlier ones, so tables never outgrow the accepted line counts.
    assert!(table.table(IdentifierKind::FullClass).len() <= stats.classes);
    assert!(table.table(IdentifierKind::ShortClass).len() <= stats.classes);
    assert!(table.table(IdentifierKind::Method).len() <= stats.methods);
    assert!(table.table(IdentifierKind::Field).len() <= stats.fields);
});
