use fresh_defaults::{Attrs, DirectConstructionForbidden, Record, RecordResult, build, literal};
use serde::{Deserialize, Serialize};

fn now() -> u64 {
    7
}

#[derive(Debug, Serialize, Deserialize, Record)]
struct Kept {
    #[record(default = now())]
    at: u64,
}

#[derive(Debug, Serialize, Deserialize, Record)]
#[record(mode = "ignore-defaults", factory = "create")]
struct Stripped {
    #[record(required)]
    name: String,
    #[record(default = Some(vec![1, 2]))]
    tags: Option<Vec<u8>>,
}

#[derive(Debug, Serialize, Deserialize, Record)]
#[record(mode = "override", forbid_direct_construction, factory = false)]
pub struct Overridden {
    #[record(default = now() + 1)]
    pub at: u64,
    pub r#type: String,
}

#[derive(Debug, Serialize, Deserialize, Record)]
struct Empty {}

fn assert_forbidden<T: DirectConstructionForbidden>() {}

fn main() -> RecordResult<()> {
    let _: Kept = literal!(Kept { at: 1 })?;
    let at = 2;
    let _: Kept = literal!(Kept { at })?;
    let _: Overridden = literal!(Overridden { r#type: String::from("z") })?;
    let _: Kept = Kept::new()?;
    let _: Stripped = Stripped::create_with(Attrs::new().with("name", &"x")?)?;
    let _: Overridden = build()?;
    let _: Overridden = Overridden::construct(Attrs::new().with("type", &"y")?)?;
    let _: Empty = Empty::new()?;
    assert_forbidden::<Overridden>();
    Ok(())
}
