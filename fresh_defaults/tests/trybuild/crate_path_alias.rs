use fresh_defaults as records;
use serde::{Deserialize, Serialize};

/// Verifies that `#[record(crate = "records")]` routes generated paths
/// through the alias.
#[derive(Debug, Serialize, Deserialize, records::Record)]
#[record(crate = "records", mode = "override")]
struct Aliased {
    #[record(default = String::from("alias"))]
    label: String,
}

fn main() {
    let result: records::RecordResult<Aliased> = Aliased::new();
    let _ = result;
    let _ = records::literal!(Aliased {});
}
