use std::path::Path;

use renderer::{AssetDir, AssetSource, SceneAssets, SCENE_UNIFORMS};

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

fn bundled() -> AssetDir {
    AssetDir::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("assets"))
}

#[test]
fn default_asset_names_resolve() {
    let assets = bundled();
    let names = SceneAssets::default();

    for name in [
        &names.vertex_shader,
        &names.fragment_shader,
        &names.skymap,
        &names.dustmap,
    ] {
        let bytes = assets
            .load(name)
            .unwrap_or_else(|err| panic!("bundled asset {name} missing: {err}"));
        assert!(!bytes.is_empty(), "{name} is empty");
    }
}

#[test]
fn textures_are_png_encoded() {
    let assets = bundled();
    let names = SceneAssets::default();

    for name in [&names.skymap, &names.dustmap] {
        let bytes = assets.load(name).unwrap();
        assert!(bytes.starts_with(PNG_SIGNATURE), "{name} is not a PNG");
    }
}

#[test]
fn fragment_shader_declares_every_scene_uniform() {
    let source = bundled().load_text("fsh.glsl").unwrap();

    assert!(source.starts_with("#version 330 core"));
    for uniform in SCENE_UNIFORMS {
        let declared = source.lines().any(|line| {
            let line = line.trim();
            line.starts_with("uniform ") && line.trim_end_matches(';').ends_with(uniform)
        });
        assert!(declared, "fsh.glsl does not declare {uniform}");
    }
}

#[test]
fn vertex_shader_reads_position_attribute_zero() {
    let source = bundled().load_text("vsh.glsl").unwrap();
    assert!(source.contains("layout(location = 0) in vec3 position;"));
}
