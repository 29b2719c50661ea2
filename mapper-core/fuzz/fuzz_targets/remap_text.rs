#![no_main]

use libfuzzer_sys::fuzz_target;
use mapper_core::mapping::MappingTable;
use mapper_core::remapper::remap;

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);
    if input.len() > 100_000 {
        return;
    }

    let mut table = MappingTable::new();
    table.record_class("net/minecraft/class_1", "net/minecraft/entity/Entity");
    table.record_class("net/minecraft/class_1$class_2", "net/minecraft/entity/Entity$Part");
    table.record_method("method_1", "tick");
    table.record_field("field_1", "age");

    let out = remap(&input, &table);

    // Without any identifier prefix the text must come back untouched.
    if !input.contains("class_") && !input.contains("method_") && !input.contains("field_") {
        assert_eq!(out.text, input);
        assert_eq!(out.substitutions, 0);
    }
});
