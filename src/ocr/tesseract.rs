use super::TextRecognizer;
use crate::error::{ExtractError, ExtractResult};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;
use tempfile::NamedTempFile;

/// Options passed to the `tesseract` command line tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TesseractConfig {
    /// Program name or path of the tesseract binary
    pub executable: String,
    /// OCR engine mode (`--oem`)
    pub oem: u32,
    /// Page segmentation mode (`--psm`), 7 treats the crop as one text line
    pub psm: u32,
    /// Language passed with `-l`, tesseract's default when unset
    pub language: Option<String>,
    /// Extra `-c name=value` variables
    pub variables: BTreeMap<String, String>,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        let variables = [
            ("tessedit_char_whitelist", "abcdefghijklmnopqrstuvwxyz0123456789._"),
            ("classify_bln_numeric_mode", "1"),
            // no dictionary corrections on usernames
            ("load_system_dawg", "0"),
            ("load_freq_dawg", "0"),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

        Self {
            executable: "tesseract".to_string(),
            oem: 1,
            psm: 7,
            language: None,
            variables,
        }
    }
}

/// Runs the tesseract binary on each crop through a temporary PNG file
#[derive(Debug, Clone, Default)]
pub struct TesseractCli {
    config: TesseractConfig,
}

impl TesseractCli {
    pub fn new(config: TesseractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TesseractConfig {
        &self.config
    }

    /// Command line arguments for recognizing `input`, text written to stdout
    pub fn args(&self, input: &Path) -> Vec<String> {
        let mut args = vec![
            input.to_string_lossy().to_string(),
            "stdout".to_string(),
            "--oem".to_string(),
            self.config.oem.to_string(),
            "--psm".to_string(),
            self.config.psm.to_string(),
        ];
        if let Some(language) = &self.config.language {
            args.push("-l".to_string());
            args.push(language.clone());
        }
        for (name, value) in &self.config.variables {
            args.push("-c".to_string());
            args.push(format!("{name}={value}"));
        }
        args
    }
}

impl TextRecognizer for TesseractCli {
    fn recognize(&self, crop: &DynamicImage) -> ExtractResult<Vec<String>> {
        let input = NamedTempFile::with_suffix(".png")?;
        crop.save(input.path()).map_err(|e| ExtractError::Ocr {
            reason: format!("failed to write crop for tesseract: {e}"),
        })?;

        let output = Command::new(&self.config.executable)
            .args(self.args(input.path()))
            .output()
            .map_err(|e| ExtractError::Ocr {
                reason: format!("failed to run '{}': {e}", self.config.executable),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::Ocr {
                reason: format!("tesseract exited with {}: {}", output.status, stderr.trim()),
            });
        }

        Ok(split_lines(&String::from_utf8_lossy(&output.stdout)))
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}
