//! Flat image directory dataset.

use std::fs;
use std::path::{Path, PathBuf};

use burn::prelude::*;
use image::imageops::FilterType;

use super::convert::rgb_to_pixels;
use crate::error::{NeuralVaeError, Result};

/// Every regular file in one directory, treated as an RGB image.
///
/// Files are listed once at construction in sorted order and decoded on each
/// access. Subdirectories are ignored; anything that fails to decode is an
/// error when it is loaded.
#[derive(Debug, Clone)]
pub struct ImageFolder {
    root: PathBuf,
    files: Vec<PathBuf>,
    image_size: usize,
}

impl ImageFolder {
    /// List the images in `root`, resizing to `image_size x image_size` on load.
    pub fn open(root: impl AsRef<Path>, image_size: usize) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        let mut files = Vec::new();
        for entry in fs::read_dir(&root)? {
            let path = entry?.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        if files.is_empty() {
            return Err(NeuralVaeError::EmptyDataset { path: root });
        }

        log::debug!("Found {} images in {:?}", files.len(), root);

        Ok(Self {
            root,
            files,
            image_size,
        })
    }

    /// Dataset directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of images.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Always false for an opened folder.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Image paths in load order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.files
    }

    /// Side length images are resized to.
    pub fn image_size(&self) -> usize {
        self.image_size
    }

    /// Decode image `index` to channel-first pixels in `[0, 1]`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn load(&self, index: usize) -> Result<Vec<f32>> {
        let path = &self.files[index];
        let decoded = image::open(path).map_err(|source| NeuralVaeError::Image {
            path: path.clone(),
            source,
        })?;

        let size = self.image_size as u32;
        let mut rgb = decoded.to_rgb8();
        if rgb.dimensions() != (size, size) {
            rgb = image::imageops::resize(&rgb, size, size, FilterType::Triangle);
        }

        Ok(rgb_to_pixels(&rgb))
    }

    /// Load the images at `indices` as a `[indices.len(), 3, S, S]` batch.
    pub fn batch<B: Backend>(&self, indices: &[usize], device: &B::Device) -> Result<Tensor<B, 4>> {
        let size = self.image_size;
        let mut values = Vec::with_capacity(indices.len() * 3 * size * size);
        for &index in indices {
            values.extend(self.load(index)?);
        }

        let data = TensorData::new(values, [indices.len(), 3, size, size]);
        Ok(Tensor::from_data(data, device))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    fn write_image(dir: &Path, name: &str, size: u32, colour: [u8; 3]) {
        RgbImage::from_pixel(size, size, Rgb(colour))
            .save(dir.join(name))
            .unwrap();
    }

    #[test]
    fn test_empty_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            ImageFolder::open(dir.path(), 16),
            Err(NeuralVaeError::EmptyDataset { .. })
        ));
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            ImageFolder::open(dir.path().join("absent"), 16),
            Err(NeuralVaeError::Io(_))
        ));
    }

    #[test]
    fn test_files_sorted_and_subdirectories_skipped() {
        let dir = TempDir::new().unwrap();
        write_image(dir.path(), "b.png", 4, [0, 0, 0]);
        write_image(dir.path(), "a.png", 4, [0, 0, 0]);
        fs::create_dir(dir.path().join("nested")).unwrap();

        let folder = ImageFolder::open(dir.path(), 4).unwrap();
        let names: Vec<_> = folder
            .paths()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.png", "b.png"]);
    }

    #[test]
    fn test_load_resizes() {
        let dir = TempDir::new().unwrap();
        write_image(dir.path(), "big.png", 20, [255, 0, 0]);

        let folder = ImageFolder::open(dir.path(), 8).unwrap();
        let pixels = folder.load(0).unwrap();

        assert_eq!(pixels.len(), 3 * 8 * 8);
        assert!(pixels[..64].iter().all(|&v| v > 0.99));
        assert!(pixels[64..].iter().all(|&v| v < 0.01));
    }

    #[test]
    fn test_undecodable_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), "not an image").unwrap();

        let folder = ImageFolder::open(dir.path(), 8).unwrap();
        assert!(matches!(folder.load(0), Err(NeuralVaeError::Image { .. })));
    }

    #[test]
    fn test_batch_shape() {
        let dir = TempDir::new().unwrap();
        for i in 0..3 {
            write_image(dir.path(), &format!("{i}.png"), 8, [10, 20, 30]);
        }

        let folder = ImageFolder::open(dir.path(), 8).unwrap();
        let device = Default::default();
        let batch = folder.batch::<NdArray>(&[2, 0], &device).unwrap();
        assert_eq!(batch.dims(), [2, 3, 8, 8]);
    }
}
