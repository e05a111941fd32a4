use flate2::write::GzEncoder;
use flate2::Compression;
use std::env;
use std::fs;
use std::io::Write;
use std::path::Path;

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest = Path::new(&out_dir).join("owid-co2-data.csv.gz");

    // The raw OWID export is ~14MB; gzip it so the WASM binary stays small.
    // The loader recognizes the gzip magic bytes and inflates at startup.
    let src = Path::new("../fixtures/owid-co2-data.csv");
    match fs::read(src) {
        Ok(raw) => {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
            encoder.write_all(&raw).unwrap();
            fs::write(&dest, encoder.finish().unwrap()).unwrap();
        }
        Err(e) => {
            println!(
                "cargo:warning=../fixtures/owid-co2-data.csv not readable ({}); embedding an empty dataset",
                e
            );
            fs::write(&dest, []).unwrap();
        }
    }

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=../fixtures/owid-co2-data.csv");
}
