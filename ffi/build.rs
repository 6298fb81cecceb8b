use std::env;
use std::path::PathBuf;

fn main() {
    let crate_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("BOOKSHELF_H")
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(out_dir.join("bookshelf.h"));
        }
        Err(e) => println!("cargo:warning=bookshelf.h not generated: {e}"),
    }
}
