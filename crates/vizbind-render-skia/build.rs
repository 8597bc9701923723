// File: crates/vizbind-render-skia/build.rs
// Summary: Links the Windows system libraries Skia's font and ICU code expect.

fn main() {
    #[cfg(target_os = "windows")]
    {
        // registry lookups from the font manager
        println!("cargo:rustc-link-lib=advapi32");
    }
}
