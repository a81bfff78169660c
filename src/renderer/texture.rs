use std::path::{Path, PathBuf};

use image::RgbaImage;
use image::imageops::{self, FilterType};
use thiserror::Error;

const MAX_ANISOTROPY: u16 = 16;

#[derive(Error, Debug)]
pub enum TextureError {
    #[error("failed to load texture {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("cubemap face {} is not square ({width}x{height})", .path.display())]
    NotSquare { path: PathBuf, width: u32, height: u32 },
    #[error("cubemap face {} is {found}px wide, expected {expected}px", .path.display())]
    FaceSize {
        path: PathBuf,
        expected: u32,
        found: u32,
    },
}

/// Decoded RGBA8 pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl ImageData {
    pub fn solid(color: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: color.to_vec(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, TextureError> {
        let image = image::open(path)
            .map_err(|source| TextureError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        Ok(Self::from_rgba(image))
    }

    fn from_rgba(image: RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            rgba: image.into_raw(),
        }
    }

    fn to_rgba(&self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.rgba.clone())
    }

    /// Downscales, keeping the aspect ratio, until neither side exceeds `max_dimension`.
    pub fn fit_within(self, max_dimension: u32) -> Self {
        let longest = self.width.max(self.height);
        if longest <= max_dimension {
            return self;
        }
        let Some(image) = self.to_rgba() else {
            return self;
        };
        let scale = f64::from(max_dimension) / f64::from(longest);
        let side = |len: u32| ((f64::from(len) * scale).round() as u32).clamp(1, max_dimension);
        Self::from_rgba(imageops::resize(
            &image,
            side(self.width),
            side(self.height),
            FilterType::Triangle,
        ))
    }

    /// Level 0 followed by successively halved levels down to 1x1.
    pub fn mip_chain(&self) -> Vec<ImageData> {
        let mut levels = vec![self.clone()];
        let Some(mut current) = self.to_rgba() else {
            return levels;
        };
        for level in 1..mip_level_count(self.width, self.height) {
            let width = (self.width >> level).max(1);
            let height = (self.height >> level).max(1);
            let next = imageops::resize(&current, width, height, FilterType::Triangle);
            levels.push(Self {
                width,
                height,
                rgba: next.as_raw().clone(),
            });
            current = next;
        }
        levels
    }
}

/// Number of levels in a full mip chain for a `width` x `height` image.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    u32::BITS - width.max(height).max(1).leading_zeros()
}

fn fit_to_limit(path: &Path, image: ImageData, max_dimension: u32) -> ImageData {
    if image.width.max(image.height) <= max_dimension {
        return image;
    }
    let (width, height) = (image.width, image.height);
    let fitted = image.fit_within(max_dimension);
    log::warn!(
        "{} is {width}x{height}, over the {max_dimension}px texture limit; downscaled to {}x{}",
        path.display(),
        fitted.width,
        fitted.height
    );
    fitted
}

/// Loads six square faces of equal size, in `+X, -X, +Y, -Y, +Z, -Z` order.
pub fn load_cube_faces(paths: &[PathBuf; 6]) -> Result<Vec<ImageData>, TextureError> {
    let mut faces: Vec<ImageData> = Vec::with_capacity(6);
    for path in paths {
        let face = ImageData::load(path)?;
        if face.width != face.height {
            return Err(TextureError::NotSquare {
                path: path.clone(),
                width: face.width,
                height: face.height,
            });
        }
        if let Some(first) = faces.first() {
            if face.width != first.width {
                return Err(TextureError::FaceSize {
                    path: path.clone(),
                    expected: first.width,
                    found: face.width,
                });
            }
        }
        faces.push(face);
    }
    Ok(faces)
}

/// Loads `path`, shrinking it to fit `max_dimension`. Unreadable files
/// become a 1x1 `fallback` texture.
pub fn load_or_solid(path: &Path, max_dimension: u32, fallback: [u8; 4]) -> ImageData {
    match ImageData::load(path) {
        Ok(image) => {
            log::info!("Loaded {} ({}x{})", path.display(), image.width, image.height);
            fit_to_limit(path, image, max_dimension)
        }
        Err(err) => {
            log::warn!("{err}; using a solid color instead");
            ImageData::solid(fallback)
        }
    }
}

pub fn load_cube_or_solid(
    paths: &[PathBuf; 6],
    max_dimension: u32,
    fallback: [u8; 4],
) -> Vec<ImageData> {
    match load_cube_faces(paths) {
        Ok(faces) => {
            log::info!("Loaded skybox cubemap ({0}x{0} per face)", faces[0].width);
            faces
                .into_iter()
                .zip(paths)
                .map(|(face, path)| fit_to_limit(path, face, max_dimension))
                .collect()
        }
        Err(err) => {
            log::warn!("{err}; using a solid skybox instead");
            vec![ImageData::solid(fallback); 6]
        }
    }
}

/// A sampled texture ready to be bound.
pub struct Texture {
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl Texture {
    /// Planet surface texture: repeats around the equator, clamps at the poles.
    pub fn surface(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        image: &ImageData,
    ) -> Self {
        let mips = image.mip_chain();
        let texture = create_texture(device, label, image.width, image.height, 1, mips.len() as u32);
        for (level, mip) in mips.iter().enumerate() {
            write_layer(queue, &texture, mip, 0, level as u32);
        }

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            anisotropy_clamp: MAX_ANISOTROPY,
            ..Default::default()
        });

        Self {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            sampler,
        }
    }

    pub fn cubemap(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        faces: &[ImageData],
    ) -> Self {
        debug_assert_eq!(faces.len(), 6);
        let size = faces[0].width;
        let texture = create_texture(device, label, size, size, 6, mip_level_count(size, size));
        for (layer, face) in faces.iter().enumerate() {
            for (level, mip) in face.mip_chain().iter().enumerate() {
                write_layer(queue, &texture, mip, layer as u32, level as u32);
            }
        }

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            anisotropy_clamp: MAX_ANISOTROPY,
            ..Default::default()
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(label),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });

        Self { view, sampler }
    }
}

fn create_texture(
    device: &wgpu::Device,
    label: &str,
    width: u32,
    height: u32,
    layers: u32,
    mip_levels: u32,
) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: layers,
        },
        mip_level_count: mip_levels,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    })
}

fn write_layer(
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    image: &ImageData,
    layer: u32,
    mip_level: u32,
) {
    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture,
            mip_level,
            origin: wgpu::Origin3d {
                x: 0,
                y: 0,
                z: layer,
            },
            aspect: wgpu::TextureAspect::All,
        },
        &image.rgba,
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(4 * image.width),
            rows_per_image: Some(image.height),
        },
        wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("planet-viewer-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_png(path: &Path, width: u32, height: u32) {
        image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]))
            .save(path)
            .unwrap();
    }

    fn face_paths(dir: &Path) -> [PathBuf; 6] {
        ["px", "nx", "py", "ny", "pz", "nz"].map(|face| dir.join(format!("{face}.png")))
    }

    #[test]
    fn loads_rgba_pixels() {
        let dir = scratch_dir("load");
        let path = dir.join("earth.png");
        write_png(&path, 3, 2);

        let image = ImageData::load(&path).unwrap();
        assert_eq!((image.width, image.height), (3, 2));
        assert_eq!(image.rgba.len(), 3 * 2 * 4);
        assert_eq!(&image.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn missing_file_falls_back_to_solid_color() {
        let path = scratch_dir("missing").join("nope.jpg");
        assert!(matches!(ImageData::load(&path), Err(TextureError::Decode { .. })));
        assert_eq!(load_or_solid(&path, 8192, [1, 2, 3, 4]), ImageData::solid([1, 2, 3, 4]));
    }

    #[test]
    fn cube_faces_must_match() {
        let dir = scratch_dir("cube");
        let paths = face_paths(&dir);
        for path in &paths {
            write_png(path, 4, 4);
        }
        assert_eq!(load_cube_faces(&paths).unwrap().len(), 6);

        write_png(&paths[4], 8, 8);
        assert!(matches!(
            load_cube_faces(&paths),
            Err(TextureError::FaceSize { expected: 4, found: 8, .. })
        ));

        write_png(&paths[0], 4, 2);
        assert!(matches!(load_cube_faces(&paths), Err(TextureError::NotSquare { .. })));
        assert_eq!(load_cube_or_solid(&paths, 8192, [0, 0, 0, 255]).len(), 6);
    }

    #[test]
    fn mip_level_count_covers_longest_side() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(4, 4), 3);
        assert_eq!(mip_level_count(8, 2), 4);
        assert_eq!(mip_level_count(5, 3), 3);
        assert_eq!(mip_level_count(8192, 4096), 14);
    }

    #[test]
    fn mip_chain_halves_down_to_one_pixel() {
        let dir = scratch_dir("mips");
        let path = dir.join("moon.png");
        write_png(&path, 8, 2);
        let image = ImageData::load(&path).unwrap();

        let chain = image.mip_chain();
        let sizes: Vec<_> = chain.iter().map(|mip| (mip.width, mip.height)).collect();
        assert_eq!(sizes, [(8, 2), (4, 1), (2, 1), (1, 1)]);
        assert_eq!(chain.len() as u32, mip_level_count(8, 2));
        for mip in &chain {
            assert_eq!(mip.rgba.len(), (mip.width * mip.height * 4) as usize);
        }
        assert_eq!(&chain[3].rgba[..], &[10, 20, 30, 255]);
        assert_eq!(ImageData::solid([1, 2, 3, 4]).mip_chain().len(), 1);
    }

    #[test]
    fn oversized_images_shrink_to_the_texture_limit() {
        let dir = scratch_dir("limit");
        let path = dir.join("earth.png");
        write_png(&path, 16, 4);

        let fitted = load_or_solid(&path, 8, [0, 0, 0, 255]);
        assert_eq!((fitted.width, fitted.height), (8, 2));
        assert_eq!(fitted.rgba.len(), 8 * 2 * 4);

        let untouched = load_or_solid(&path, 16, [0, 0, 0, 255]);
        assert_eq!((untouched.width, untouched.height), (16, 4));

        let paths = face_paths(&dir);
        for path in &paths {
            write_png(path, 16, 16);
        }
        let faces = load_cube_or_solid(&paths, 4, [0, 0, 0, 255]);
        assert!(faces.iter().all(|face| (face.width, face.height) == (4, 4)));
    }
}
