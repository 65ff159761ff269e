use std::fs::{self, File};
use std::io::{self, copy, Cursor};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;

pub mod data_model;
pub mod ingest;
pub mod realtime;

pub mod sources {
    /// Complete public transit network, Germany-wide.
    pub const GERMANY_ALL: &str = "https://download.gtfs.de/germany/free/latest.zip";

    /// Long-distance rail (ICE, IC, EC, night trains) only.
    pub const GERMANY_LONG_DISTANCE_RAIL_TRANSPORT: &str =
        "https://download.gtfs.de/germany/fv_free/latest.zip";

    /// Local public transport (subway, tram, ferry, bus) only.
    pub const GERMANY_PUBLIC_LOCAL_TRANSPORT: &str =
        "https://download.gtfs.de/germany/nv_free/latest.zip";

    /// Regional rail only.
    pub const GERMANY_REGIONAL_RAIL_TRANSPORT: &str =
        "https://download.gtfs.de/germany/rv_free/latest.zip";

    pub const GERMANY_REALTIME: &str = "https://realtime.gtfs.de/realtime-free.pb";
}

/// Downloads and extracts a GTFS static feed zip into `dest_dir`.
pub async fn download_gtfs(
    url: &str,
    dest_dir: &Path,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let zip_path = dest_dir.join("latest.zip");
    download_file(url, &zip_path).await?;
    extract_zip(&zip_path, dest_dir)?;
    Ok(())
}

pub async fn download_file(
    url: &str,
    dest: &Path,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let jar = Arc::new(Jar::default());

    let client = reqwest::Client::builder()
        .cookie_provider(Arc::clone(&jar))
        .timeout(Duration::from_secs(60))
        .build()?;

    let response = client.get(url).send().await?;
    let mut file = fs::File::create(dest)?;
    let mut content = Cursor::new(response.bytes().await?);
    copy(&mut content, &mut file)?;
    Ok(())
}

fn extract_zip(zip_path: &Path, dest_dir: &Path) -> Result<(), io::Error> {
    let file = File::open(zip_path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let outpath = match file.enclosed_name() {
            Some(path) => dest_dir.join(path),
            None => continue,
        };

        if file.name().ends_with('/') {
            fs::create_dir_all(&outpath)?;
        } else {
            if let Some(parent) = outpath.parent() {
                if !parent.exists() {
                    fs::create_dir_all(parent)?;
                }
            }
            let mut outfile = File::create(&outpath)?;
            copy(&mut file, &mut outfile)?;
        }
    }

    Ok(())
}
