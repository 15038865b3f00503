use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Result;
use assert_cmd::prelude::*;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use image::RgbImage;
use predicates::prelude::*;
use rstest::*;
use serde_json::{Value, json};

macro_rules! cargo_run {
    ($cmd:expr, $($args:expr),*) => {
        {
            let mut cmd = Command::cargo_bin($cmd)?;
            $(cmd.arg($args);)*
            cmd.assert()
        }
    };
}

const SPACE: &str = r#"{
    "colorString": ["Red(255,0,0)", "Blue(0,0,255)"],
    "impressions": [["passion", 1, 0], ["calm", 0, 1]]
}"#;

fn write_image(dir: &Path, name: &str, pixels: &[[u8; 3]]) -> Result<PathBuf> {
    let path = dir.join(name);
    RgbImage::from_raw(pixels.len() as u32, 1, pixels.concat()).unwrap().save(&path)?;
    Ok(path)
}

#[fixture]
fn workdir() -> TempDir {
    let dir = TempDir::new().unwrap();
    dir.child("space.json").write_str(SPACE).unwrap();
    let images = dir.child("images");
    images.create_dir_all().unwrap();
    write_image(images.path(), "red.png", &[[255, 0, 0]]).unwrap();
    write_image(images.path(), "blue.png", &[[0, 0, 255]]).unwrap();
    write_image(images.path(), "pair.png", &[[255, 0, 0], [0, 0, 255]]).unwrap();
    images.child("readme.txt").write_str("not an image").unwrap();
    dir
}

fn read_json(path: &Path) -> Result<Value> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

#[rstest]
fn rank_directory(workdir: TempDir) -> Result<()> {
    cargo_run!(
        "imsense",
        "rank",
        "--space",
        workdir.child("space.json").path(),
        "--definitions",
        workdir.child("definitions.json").path(),
        "--database",
        workdir.child("database.json").path(),
        workdir.child("images").path()
    )
    .success();

    let database: BTreeMap<String, Vec<f64>> =
        serde_json::from_value(read_json(workdir.child("database.json").path())?)?;
    assert_eq!(database.keys().collect::<Vec<_>>(), ["blue.png", "pair.png", "red.png"]);
    assert_eq!(database["pair.png"], vec![65025.0, 65025.0]);
    assert_eq!(database["red.png"], vec![0.0, 130050.0]);

    let definitions = read_json(workdir.child("definitions.json").path())?;
    assert_eq!(definitions["features"][1]["name"], json!("Blue"));
    assert_eq!(definitions["features"][1]["rgb"], json!([0, 0, 255]));
    assert_eq!(definitions["keywords"]["calm"], json!([0.0, 1.0]));

    Ok(())
}

#[rstest]
fn rank_script_format(workdir: TempDir) -> Result<()> {
    let definitions = workdir.child("definitions.js");
    let database = workdir.child("database.js");
    cargo_run!(
        "imsense",
        "rank",
        "--format",
        "script",
        "--space",
        workdir.child("space.json").path(),
        "--definitions",
        definitions.path(),
        "--database",
        database.path(),
        workdir.child("images/red.png").path()
    )
    .success();

    definitions.assert(predicate::str::starts_with("var spaceDefinitions = {"));
    database.assert(predicate::str::starts_with("var spaceDatabase = {"));
    database.assert(predicate::str::contains("\"red.png\""));

    Ok(())
}

#[rstest]
fn rank_skips_broken_image(workdir: TempDir) -> Result<()> {
    workdir.child("images/broken.png").write_str("garbage")?;

    cargo_run!(
        "imsense",
        "rank",
        "--space",
        workdir.child("space.json").path(),
        "--definitions",
        workdir.child("definitions.json").path(),
        "--database",
        workdir.child("database.json").path(),
        workdir.child("images").path()
    )
    .success()
    .stderr(predicate::str::contains("broken.png"));

    let database = read_json(workdir.child("database.json").path())?;
    assert_eq!(database.as_object().unwrap().len(), 3);

    cargo_run!(
        "imsense",
        "rank",
        "--fail-fast",
        "--space",
        workdir.child("space.json").path(),
        "--definitions",
        workdir.child("definitions2.json").path(),
        "--database",
        workdir.child("database2.json").path(),
        workdir.child("images").path()
    )
    .failure()
    .stderr(predicate::str::contains("broken.png"));

    workdir.child("definitions2.json").assert(predicate::path::missing());
    workdir.child("database2.json").assert(predicate::path::missing());

    Ok(())
}

#[rstest]
#[case::rating_count(r#"{ "colorString": ["Red(255,0,0)"], "impressions": [["calm", 1, 2]] }"#, "calm")]
#[case::bad_color(r#"{ "colorString": ["Red(255,0,300)"], "impressions": [] }"#, "Red(255,0,300)")]
fn rank_invalid_space(workdir: TempDir, #[case] space: &str, #[case] message: &str) -> Result<()> {
    workdir.child("bad.json").write_str(space)?;

    cargo_run!(
        "imsense",
        "rank",
        "--space",
        workdir.child("bad.json").path(),
        "--definitions",
        workdir.child("definitions.json").path(),
        "--database",
        workdir.child("database.json").path(),
        workdir.child("images").path()
    )
    .failure()
    .stderr(predicate::str::contains(message));

    workdir.child("definitions.json").assert(predicate::path::missing());
    workdir.child("database.json").assert(predicate::path::missing());

    Ok(())
}

#[rstest]
fn define_only(workdir: TempDir) -> Result<()> {
    cargo_run!(
        "imsense",
        "define",
        "--space",
        workdir.child("space.json").path(),
        "--definitions",
        workdir.child("definitions.json").path()
    )
    .success();

    let definitions = read_json(workdir.child("definitions.json").path())?;
    assert_eq!(definitions["features"][0]["hsv"], json!([0.0, 1.0, 1.0]));
    assert_eq!(definitions["keywords"]["passion"], json!([1.0, 0.0]));

    Ok(())
}

#[rstest]
fn show_image(workdir: TempDir) -> Result<()> {
    cargo_run!(
        "imsense",
        "show",
        "--space",
        workdir.child("space.json").path(),
        workdir.child("images/pair.png").path()
    )
    .success()
    .stdout(predicate::str::contains("65025.00\tRed"))
    .stdout(predicate::str::contains("65025.00\tBlue"));

    Ok(())
}

#[rstest]
fn search_keyword(workdir: TempDir) -> Result<()> {
    workdir
        .child("database.json")
        .write_str(r#"{ "red.png": [0, 130050], "blue.png": [130050, 0], "pair.png": [32512.5, 32512.5] }"#)?;

    let output = cargo_run!(
        "imsense",
        "search",
        "--space",
        workdir.child("space.json").path(),
        "--database",
        workdir.child("database.json").path(),
        "--max-distance",
        "40000",
        "--output-format",
        "json",
        "passion"
    )
    .success()
    .get_output()
    .stdout
    .clone();

    let hits: Value = serde_json::from_slice(&output)?;
    assert_eq!(hits, json!([{ "image": "red.png", "score": 0.0 }, { "image": "pair.png", "score": 32512.5 }]));

    cargo_run!(
        "imsense",
        "search",
        "--space",
        workdir.child("space.json").path(),
        "--database",
        workdir.child("database.json").path(),
        "joy"
    )
    .failure()
    .stderr(predicate::str::contains("joy"));

    Ok(())
}
