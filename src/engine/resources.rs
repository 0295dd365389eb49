use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use image::RgbaImage;

use crate::game::AssetManifest;

/// Decoded assets, loaded once at startup.
#[derive(Default, Debug)]
pub struct ResourceManager {
    textures: HashMap<String, RgbaImage>,
    sounds: HashMap<String, Arc<[u8]>>,
}

impl ResourceManager {
    pub fn load(manifest: &AssetManifest) -> Result<Self> {
        let mut resources = Self::default();
        for (key, path) in &manifest.textures {
            resources.load_texture(key.clone(), path)?;
        }
        for (key, path) in &manifest.sounds {
            resources.load_sound(key.clone(), path)?;
        }
        Ok(resources)
    }

    pub fn load_texture(&mut self, key: impl Into<String>, path: impl AsRef<Path>) -> Result<()> {
        let key = key.into();
        let path = path.as_ref();
        let image = image::open(path)
            .with_context(|| format!("failed to load texture {}", path.display()))?
            .to_rgba8();
        tracing::debug!(
            target: "assets",
            %key,
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "texture loaded"
        );
        self.textures.insert(key, image);
        Ok(())
    }

    /// Keeps the encoded bytes; decoding happens per playback.
    pub fn load_sound(&mut self, key: impl Into<String>, path: impl AsRef<Path>) -> Result<()> {
        let key = key.into();
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to load sound {}", path.display()))?;
        tracing::debug!(
            target: "assets",
            %key,
            path = %path.display(),
            bytes = bytes.len(),
            "sound loaded"
        );
        self.sounds.insert(key, Arc::from(bytes));
        Ok(())
    }

    pub fn textures(&self) -> impl Iterator<Item = (&str, &RgbaImage)> {
        self.textures.iter().map(|(key, image)| (key.as_str(), image))
    }

    pub fn sounds(&self) -> impl Iterator<Item = (&str, &Arc<[u8]>)> {
        self.sounds.iter().map(|(key, bytes)| (key.as_str(), bytes))
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn sound_count(&self) -> usize {
        self.sounds.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_texture_names_the_path() {
        let manifest = AssetManifest {
            textures: vec![("bird".into(), PathBuf::from("assets/missing.png"))],
            sounds: Vec::new(),
        };
        let err = ResourceManager::load(&manifest).unwrap_err();
        assert!(format!("{err:#}").contains("assets/missing.png"));
    }
}
