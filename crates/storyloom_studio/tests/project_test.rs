use std::path::PathBuf;
use storyloom_core::{GenerationStatus, ScenePatch};
use storyloom_studio::ProjectFile;
use tempfile::TempDir;

const PROJECT: &str = r#"
[project]
name = "Night Run"

[[character]]
name = "Ada"
style = "red scarf, watercolor"
images = ["refs/ada.png", "refs/ada_side.jpg"]
default = true

[[character]]
name = "Bram"
style = "grey coat"

[[scene]]
script = "Rooftops at dusk"
prompt = "establishing shot"

[[scene]]
script = "Ada sprints"
prompt = "tracking shot"
characters = ["Ada", "Bram"]
result = "out/2.png"
"#;

async fn write_fixture(dir: &TempDir) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(dir.path().join("refs")).await?;
    tokio::fs::create_dir_all(dir.path().join("out")).await?;
    tokio::fs::write(dir.path().join("refs/ada.png"), [1u8]).await?;
    tokio::fs::write(dir.path().join("refs/ada_side.jpg"), [2u8]).await?;
    tokio::fs::write(dir.path().join("out/2.png"), [3u8]).await?;
    tokio::fs::write(dir.path().join("story.toml"), PROJECT).await?;
    Ok(())
}

#[tokio::test]
async fn loads_characters_scenes_and_previous_results() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_fixture(&dir).await?;

    let project = ProjectFile::from_file(dir.path().join("story.toml")).await?;
    assert_eq!(project.project.name, "Night Run");

    let store = project.load_store(dir.path()).await?;
    assert_eq!(store.characters().len(), 2);

    let ada = store.character_by_name("Ada").cloned();
    assert!(ada.as_ref().is_some_and(|c| c.is_default && c.images.len() == 2));
    assert_eq!(
        ada.as_ref().map(|c| c.images[1].payload.mime.as_str()),
        Some("image/jpeg")
    );

    let scenes = store.scenes();
    assert_eq!(scenes.len(), 2);
    // Scenes without a character list keep the default pre-selection.
    assert_eq!(scenes[0].selected_character_ids.len(), 1);
    assert_eq!(scenes[1].selected_character_ids.len(), 2);
    assert_eq!(scenes[1].status, GenerationStatus::Success);
    assert_eq!(
        store.style_anchor().map(|s| s.index),
        Some(2)
    );
    Ok(())
}

#[tokio::test]
async fn unknown_character_name_is_rejected() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let project = ProjectFile::from_toml(
        r#"
        [[scene]]
        script = "x"
        characters = ["Nobody"]
        "#,
    )?;
    let err = project.load_store(dir.path()).await.err();
    assert!(err.is_some_and(|e| e.user_message().contains("Nobody")));
    Ok(())
}

#[tokio::test]
async fn empty_character_list_uses_placeholders() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let project = ProjectFile::from_toml("[[scene]]\nscript = \"x\"\ncharacters = [\"Character 2\"]\n")?;
    let store = project.load_store(dir.path()).await?;
    assert_eq!(store.characters().len(), 3);
    assert_eq!(
        store.scenes()[0].selected_character_ids,
        vec![store.characters()[1].id.clone()]
    );
    Ok(())
}

#[tokio::test]
async fn too_many_reference_images_are_rejected() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let mut images = Vec::new();
    for i in 0..6 {
        let name = format!("{i}.png");
        tokio::fs::write(dir.path().join(&name), [i as u8]).await?;
        images.push(format!("\"{name}\""));
    }
    let text = format!("[[character]]\nname = \"Ada\"\nimages = [{}]\n", images.join(", "));
    let project = ProjectFile::from_toml(&text)?;
    assert!(project.load_store(dir.path()).await.is_err());
    Ok(())
}

#[tokio::test]
async fn results_are_recorded_and_saved() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_fixture(&dir).await?;
    let path = dir.path().join("story.toml");

    let mut project = ProjectFile::from_file(&path).await?;
    let store = project.load_store(dir.path()).await?;
    project.record_results(
        &store,
        &[(1, PathBuf::from("out/1.png")), (9, PathBuf::from("out/9.png"))],
    );
    project.save(&path).await?;

    let reloaded = ProjectFile::from_file(&path).await?;
    assert_eq!(reloaded.scenes[0].result, Some(PathBuf::from("out/1.png")));
    assert_eq!(reloaded.scenes.len(), 2);
    assert_eq!(reloaded, project);
    Ok(())
}

#[tokio::test]
async fn failed_scenes_lose_their_stale_result() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_fixture(&dir).await?;
    let path = dir.path().join("story.toml");

    let mut project = ProjectFile::from_file(&path).await?;
    let mut store = project.load_store(dir.path()).await?;
    let failed_id = store.scenes()[1].id.clone();
    store.update_scene(&failed_id, ScenePatch::failed("API returned no image.".into()))?;

    project.record_results(&store, &[]);
    project.save(&path).await?;

    let reloaded = ProjectFile::from_file(&path).await?;
    assert_eq!(reloaded.scenes[1].result, None);
    let store = reloaded.load_store(dir.path()).await?;
    assert_eq!(store.scenes()[1].status, GenerationStatus::Pending);
    assert!(store.style_anchor().is_none());
    Ok(())
}

#[test]
fn invalid_toml_is_a_project_error() {
    let err = ProjectFile::from_toml("[[scene]\nscript = ").err();
    assert!(err.is_some_and(|e| e.user_message().starts_with("Project file error")));
}
