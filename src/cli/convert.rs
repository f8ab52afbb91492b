use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use log::info;
use serde::Serialize;

use thorstack::converter::{ConversionConfig, ConversionStats, ConvertError, StackConverter};

/// Convert a Thorlabs acquisition directory to OME-TIFF stacks
pub fn run(
    tiff_dir: PathBuf,
    xml: PathBuf,
    output_dir: Option<PathBuf>,
    save_raw: bool,
) -> Result<()> {
    if !tiff_dir.exists() {
        anyhow::bail!("TIFF directory not found: {}", tiff_dir.display());
    }
    if !xml.exists() {
        anyhow::bail!("Experiment.xml not found: {}", xml.display());
    }

    let dataset = tiff_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string());

    let output_dir = output_dir.unwrap_or_else(|| {
        tiff_dir
            .parent()
            .unwrap_or(Path::new("."))
            .join(format!("output_{dataset}"))
    });
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;

    info!("thorstack - Thorlabs TIFF to OME-TIFF");
    info!("=====================================");
    info!("TIFF dir   : {}", tiff_dir.display());
    info!("XML        : {}", xml.display());
    info!("Output dir : {}", output_dir.display());
    if save_raw {
        info!("Raw twins  : enabled");
    }

    let converter = StackConverter::with_config(ConversionConfig { save_raw });

    let start = Instant::now();
    let result = converter.convert(&tiff_dir, &xml, &output_dir);
    let elapsed = start.elapsed().as_secs_f64();

    let summary = RunSummary::for_run(&dataset, &tiff_dir, &xml, &output_dir, &result, elapsed);
    summary.write_to(&output_dir)?;

    let stats = result.with_context(|| format!("failed dataset {dataset}"))?;

    info!("Conversion complete!");
    info!("  Groups written: {}", stats.groups_written);
    info!("  Files written : {}", stats.outputs.len());
    info!("  Files skipped : {}", stats.files_skipped);

    Ok(())
}

/// Machine-readable record of one run, written next to the outputs whether
/// the run succeeded or failed.
#[derive(Debug, Serialize)]
struct RunSummary {
    mode: &'static str,
    dataset: String,
    tiff_dir: String,
    xml: String,
    output_dir: String,
    n_files_written: usize,
    runtime_sec: f64,
    timestamp: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl RunSummary {
    fn for_run(
        dataset: &str,
        tiff_dir: &Path,
        xml: &Path,
        output_dir: &Path,
        result: &Result<ConversionStats, ConvertError>,
        elapsed: f64,
    ) -> Self {
        let (status, n_files_written, error) = match result {
            Ok(stats) => ("success", stats.outputs.len(), None),
            Err(err) => ("failed", 0, Some(err.to_string())),
        };
        Self {
            mode: "local",
            dataset: dataset.to_string(),
            tiff_dir: tiff_dir.display().to_string(),
            xml: xml.display().to_string(),
            output_dir: output_dir.display().to_string(),
            n_files_written,
            runtime_sec: (elapsed * 100.0).round() / 100.0,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            status,
            error,
        }
    }

    fn write_to(&self, dir: &Path) -> Result<()> {
        let path = dir.join("summary.json");
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)
            .with_context(|| format!("failed to write summary {}", path.display()))?;
        info!("summary written -> {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn summary_records_success() {
        let stats = ConversionStats {
            files_seen: 3,
            files_skipped: 1,
            groups_written: 1,
            outputs: vec![PathBuf::from("out/a.ome.tif")],
        };
        let summary = RunSummary::for_run(
            "run1",
            Path::new("/data/run1"),
            Path::new("/data/run1/Experiment.xml"),
            Path::new("/data/output_run1"),
            &Ok(stats),
            1.234,
        );

        assert_eq!(summary.status, "success");
        assert_eq!(summary.n_files_written, 1);
        assert_eq!(summary.runtime_sec, 1.23);
        assert!(summary.error.is_none());
    }

    #[test]
    fn summary_round_trips_through_json() {
        let dir = tempdir().unwrap();
        let summary = RunSummary::for_run(
            "run1",
            Path::new("/data/run1"),
            Path::new("/data/run1/Experiment.xml"),
            dir.path(),
            &Err(ConvertError::MissingDirectory(PathBuf::from("/data/run1"))),
            0.5,
        );
        summary.write_to(dir.path()).unwrap();

        let raw = fs::read_to_string(dir.path().join("summary.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["dataset"], "run1");
        assert!(value["error"].as_str().unwrap().contains("/data/run1"));
    }
}
