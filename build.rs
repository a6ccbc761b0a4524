//! Injects the Wi-Fi credentials at compile time.
//!
//! `WIFI_SSID` and `WIFI_PASSWORD` are taken from the environment, or from a
//! `.env` file next to this manifest. Missing values fall back to the
//! placeholders in `baro_node_core::config`.

const CREDENTIALS: [&str; 2] = ["WIFI_SSID", "WIFI_PASSWORD"];

fn main() {
    println!("cargo:rerun-if-changed=.env");
    for key in CREDENTIALS {
        println!("cargo:rerun-if-env-changed={key}");
    }

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            println!("cargo:warning=could not read .env: {e}");
        }
    }

    for key in CREDENTIALS {
        match std::env::var(key) {
            Ok(value) => println!("cargo:rustc-env={key}={value}"),
            Err(_) => println!("cargo:warning={key} not set, using the placeholder"),
        }
    }

    println!("cargo:rustc-link-arg=-Tlinkall.x");
}
