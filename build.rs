use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=MCU_FREQ_HZ");

    // Pass CPU frequency for timing calculations
    let freq = env::var("MCU_FREQ_HZ").unwrap_or_else(|_| String::from("16000000"));
    println!("cargo:rustc-env=MCU_FREQ_HZ={}", freq);

    // Host builds run the library tests against mocks
    let target = env::var("TARGET").unwrap_or_default();
    if !target.contains("avr") {
        return;
    }

    // Configure for ATmega2560
    println!("cargo:rustc-link-arg=-mmcu=atmega2560");

    if env::var("PROFILE").map(|p| p == "debug").unwrap_or(false) {
        println!("cargo:warning=Building for ATmega2560 at {} Hz (debug)", freq);
    }
}
