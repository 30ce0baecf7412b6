//! Validate an advert script file.

use std::path::PathBuf;

use spotcut_script_model::Script;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating script at: {}", path.display());

    let script = Script::load(&path).map_err(|e| anyhow::anyhow!("Validation failed: {e}"))?;

    println!("  Scenes: {}", script.scenes.len());
    println!("  Sub-units: {}", script.sub_unit_count());
    for scene in &script.scenes {
        let pinned = scene
            .sub_scenes
            .iter()
            .filter(|s| s.source_url.is_some())
            .count();
        println!(
            "  Scene {:03}: {} sub-unit(s), {} pinned source(s)",
            scene.scene_id,
            scene.sub_scenes.len(),
            pinned
        );
    }

    println!("\nScript is valid.");
    Ok(())
}
