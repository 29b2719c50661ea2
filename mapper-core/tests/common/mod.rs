#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::write::FileOptions;

pub const SAMPLE_TINY: &str = "tiny\t2\t0\tintermediary\tnamed
c\tnet/minecraft/class_1\tnet/minecraft/entity/MyEntity
\tm\t()V\tmethod_42\ttick
\tf\tI\tfield_7\tage
c\tnet/minecraft/class_1$class_2\tnet/minecraft/entity/MyEntity$Part
\tm\t(Lnet/minecraft/class_1;)V\tmethod_43
\tc\tA javadoc line
";

pub fn meta_json(builds: &[(&str, u32)]) -> String {
    let entries: Vec<String> = builds
        .iter()
        .map(|(game_version, build)| {
            format!(
                r#"{{"gameVersion":"{gv}","separator":"+build.","build":{b},"maven":"net.fabricmc:yarn:{gv}+build.{b}","version":"{gv}+build.{b}","stable":true}}"#,
                gv = game_version,
                b = build
            )
        })
        .collect();
    format!("[{}]", entries.join(","))
}

pub fn jar_path(game_version: &str, build: u32) -> String {
    let artifact = format!("{}+build.{}", game_version, build);
    format!("/maven/{}/yarn-{}-v2.jar", artifact, artifact)
}

pub fn build_jar(tiny: &str) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("META-INF/MANIFEST.MF", FileOptions::default())
        .unwrap();
    writer.write_all(b"Manifest-Version: 1.0\n").unwrap();
    writer
        .start_file("mappings/mappings.tiny", FileOptions::default())
        .unwrap();
    writer.write_all(tiny.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

pub fn build_jar_without_mappings() -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("META-INF/MANIFEST.MF", FileOptions::default())
        .unwrap();
    writer.write_all(b"Manifest-Version: 1.0\n").unwrap();
    writer.finish().unwrap().into_inner()
}
