fn main() {
    // Cargo names the artifact libsimplemath_abi.so; the loaded name is libSimpleMath.so.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("linux") {
        println!("cargo:rustc-cdylib-link-arg=-Wl,-soname,libSimpleMath.so");
    }
    println!("cargo:rerun-if-changed=build.rs");
}
