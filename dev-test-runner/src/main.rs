//! End-to-end exercise of the `jsonable` crate against realistic payloads.
//!
//! Not a test suite: a manual harness for eyeballing output shapes and
//! error messages during development. `cargo run -p dev-test-runner`.

use jsonable::{from_json_str, jsonable, Jsonable, Writable};
use serde_json::{json, Value};

jsonable! {
    pub struct Location {
        pub lat: f64,
        pub lon: f64,
    }
}

jsonable! {
    pub struct Business {
        pub id: String,
        pub name: String,
        pub location: Location,
        pub rating: f64,
        pub open: bool,
        pub categories: Vec<String>,
        pub extra: Value,
    }
}

jsonable! {
    pub struct Directory {
        pub version: u64,
        pub entries: Vec<Business>,
    }
}

/// Realistic payload samples in the shape external APIs actually return:
/// nested mappings, homogeneous lists, and a free-form `extra` blob.
fn realistic_samples() -> Vec<Value> {
    vec![
        json!({
            "version": 3,
            "entries": [
                {
                    "id": "0ahUKEa1ZQ",
                    "name": "Acme Widgets",
                    "location": {"lat": 37.4219, "lon": -122.0840},
                    "rating": 4.3,
                    "open": true,
                    "categories": ["hardware", "store"],
                    "extra": {"phone": "+1-555-0100"},
                },
                {
                    "id": "0ahUKEa2ZQ",
                    "name": "Acme Widgets - East",
                    "location": {"lat": 37.4200, "lon": -122.0830},
                    "rating": 4.5,
                    "open": false,
                    "categories": ["hardware"],
                    "extra": null,
                },
            ],
        }),
        json!({
            "version": 4,
            "entries": [],
        }),
    ]
}

fn main() {
    for (i, sample) in realistic_samples().iter().enumerate() {
        println!("—— sample {i} ——");
        match Directory::from_json(sample) {
            Ok(dir) => {
                println!("parsed {} entries (version {})", dir.entries.len(), dir.version);
                let text = jsonable::to_string_pretty(&dir).expect("record trees always lower");
                println!("{text}");
                let back: Directory = from_json_str(&text).expect("round trip");
                assert_eq!(back, dir);
                // The serde bridge must agree with the codec's own writer.
                let via_serde = serde_json::to_value(&dir).expect("serde bridge");
                assert_eq!(via_serde, jsonable::to_value(&dir).expect("record trees always lower"));
                println!("round trip ok");
            }
            Err(error) => {
                println!("❌ failed: {error}");
            }
        }
    }

    // Error-path demos: the messages below are the point of the exercise.
    println!("—— error demos ——");
    let missing = Directory::from_json(&json!({"entries": []}));
    println!("missing field  → {}", missing.unwrap_err());

    let bad_type = Directory::from_json(&json!({
        "version": 1,
        "entries": [{"id": "x", "name": "y", "location": {"lat": "north", "lon": 0.0},
                     "rating": 1.0, "open": true, "categories": [], "extra": null}],
    }));
    println!("bad type       → {}", bad_type.unwrap_err());

    #[derive(Debug)]
    struct Handle;
    let opaque = jsonable::write_json(&Writable::Seq(vec![
        Writable::from(1_i64),
        Writable::opaque::<Handle>(),
    ]));
    println!("opaque value   → {}", opaque.unwrap_err());

    println!("schema: {}", Business::schema());
}
