use std::fs;
use std::path::{Path, PathBuf};

use crate::orbit::parsing::parse_multi_tle;
use crate::orbit::{OrbitError, TleOrbit};

pub struct TleEntry {
    pub name: String,
    pub norad_id: u32,
    pub source: String,
    pub orbit: TleOrbit,
}

pub struct TleLoader {
    tle_dir: PathBuf,
}

impl TleLoader {
    pub fn new(tle_dir: PathBuf) -> Self {
        Self { tle_dir }
    }

    /// Load all `.tle`/`.txt` files from the directory, ordered by NORAD id.
    pub fn load_all(&self) -> Result<Vec<TleEntry>, OrbitError> {
        if !self.tle_dir.exists() {
            return Err(OrbitError::DirectoryNotFound(
                self.tle_dir.display().to_string(),
            ));
        }

        let mut satellites = Vec::new();
        for entry in fs::read_dir(&self.tle_dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let is_tle = path
                .extension()
                .map(|ext| ext == "tle" || ext == "txt")
                .unwrap_or(false);
            if !is_tle {
                continue;
            }

            match parse_tle_file(&path) {
                Ok(entries) => satellites.extend(entries),
                Err(e) => {
                    log::warn!("Failed to parse TLE file {}: {}", path.display(), e);
                }
            }
        }

        satellites.sort_by_key(|s| s.norad_id);
        satellites.dedup_by_key(|s| s.norad_id);
        Ok(satellites)
    }
}

/// Parse a single TLE file (may contain multiple satellites)
fn parse_tle_file(path: &Path) -> Result<Vec<TleEntry>, OrbitError> {
    let content = fs::read_to_string(path)?;
    let filename = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let mut results = Vec::new();
    for (name, line1, line2) in parse_multi_tle(&content) {
        let orbit = TleOrbit::from_lines(name.clone(), &line1, &line2).map_err(|e| {
            OrbitError::InvalidTle {
                file: filename.clone(),
                message: e.to_string(),
            }
        })?;

        let norad_id = orbit.elements().norad_id as u32;
        results.push(TleEntry {
            name: name.unwrap_or_else(|| format!("NORAD {}", norad_id)),
            norad_id,
            source: filename.clone(),
            orbit,
        });
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOAA: &str = "NOAA 20
1 41433U 16038A   23060.82382890  .00000023  00000-0  27580-4 0  9995
2 41433  98.7027 125.3296 0011204  78.3014 281.9531 14.12586102978923
";

    #[test]
    fn missing_directory_is_an_error() {
        let loader = TleLoader::new(PathBuf::from("/nonexistent/tle/dir"));
        assert!(matches!(
            loader.load_all(),
            Err(OrbitError::DirectoryNotFound(_))
        ));
    }

    #[test]
    fn loads_tle_files_and_skips_others() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("weather.tle"), NOAA).unwrap();
        fs::write(dir.path().join("notes.md"), NOAA).unwrap();
        fs::write(dir.path().join("broken.txt"), "X\n1 bad\n2 bad\n").unwrap();

        let entries = TleLoader::new(dir.path().to_path_buf()).load_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "NOAA 20");
        assert_eq!(entries[0].norad_id, 41433);
        assert_eq!(entries[0].source, "weather.tle");
    }
}
