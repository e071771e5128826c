fn main() {
    #[cfg(feature = "system-lapack")]
    {
        println!("cargo:rerun-if-env-changed=NETLA_LAPACK_LIB");
        println!("cargo:rerun-if-env-changed=NETLA_LAPACK_DIR");

        if std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default() == "macos" {
            println!("cargo:rustc-link-lib=framework=Accelerate");
        } else {
            if let Ok(dir) = std::env::var("NETLA_LAPACK_DIR") {
                println!("cargo:rustc-link-search=native={dir}");
            }
            let lib = std::env::var("NETLA_LAPACK_LIB").unwrap_or_else(|_| "lapack".into());
            println!("cargo:rustc-link-lib={lib}");
        }
    }
}
