use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::fs::File;
use tempfile::tempdir;

#[test]
fn export_without_project_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    #[allow(deprecated)]
    Command::cargo_bin("adpress")?
        .current_dir(dir.path())
        .arg("export")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no adpress project found"));

    Ok(())
}

#[test]
fn export_without_output_directory_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("adpress.yml"), "output: output\n")?;

    #[allow(deprecated)]
    Command::cargo_bin("adpress")?
        .current_dir(dir.path())
        .arg("export")
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("does not exist")
                .and(predicate::str::contains("adpress build")),
        );

    // The failure did not leave an empty archives directory behind
    assert!(!dir.path().join("archives").exists());

    Ok(())
}

#[test]
fn export_zips_output_with_timestamped_name() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("adpress.yml"), "output: output\n")?;

    let output = dir.path().join("output");
    fs::create_dir_all(output.join("assets"))?;
    fs::write(output.join("index.pdf"), b"%PDF-1.7 fake")?;
    fs::write(output.join("assets/logo.svg"), "<svg/>")?;

    #[allow(deprecated)]
    Command::cargo_bin("adpress")?
        .current_dir(dir.path())
        .arg("export")
        .assert()
        .success()
        .stdout(predicate::str::contains("Archive written"));

    let archives: Vec<_> = fs::read_dir(dir.path().join("archives"))?
        .filter_map(|e| e.ok())
        .collect();
    assert_eq!(archives.len(), 1);

    // output-YYYY-MM-DDTHH-MM-SSZ.zip
    let name = archives[0].file_name().to_string_lossy().into_owned();
    assert!(name.starts_with("output-"), "name was: {}", name);
    assert!(name.ends_with("Z.zip"), "name was: {}", name);
    assert_eq!(name.len(), "output-".len() + 20 + ".zip".len());

    let mut archive = zip::ZipArchive::new(File::open(archives[0].path())?)?;
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).map(|f| f.name().to_string()))
        .collect::<Result<_, _>>()?;
    assert!(names.contains(&"output/index.pdf".to_string()));
    assert!(names.contains(&"output/assets/logo.svg".to_string()));

    Ok(())
}

#[test]
fn export_respects_configured_directories() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("adpress.yml"),
        "output: public\narchive_dir: exports\n",
    )?;

    let output = dir.path().join("public");
    fs::create_dir_all(&output)?;
    fs::write(output.join("doc.html"), "<html></html>")?;

    #[allow(deprecated)]
    Command::cargo_bin("adpress")?
        .current_dir(dir.path())
        .arg("export")
        .assert()
        .success();

    let archives: Vec<_> = fs::read_dir(dir.path().join("exports"))?
        .filter_map(|e| e.ok())
        .collect();
    assert_eq!(archives.len(), 1);
    assert!(archives[0]
        .file_name()
        .to_string_lossy()
        .starts_with("public-"));

    Ok(())
}
