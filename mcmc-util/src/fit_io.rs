use crate::error::{PosteriorError, Result};
use log::info;
use matrix_util::common_io::{mkdir, open_buf_reader, open_buf_writer};
use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DEFAULT_FIT_DIR: &str = "stan_fits";
pub const DEFAULT_FIT_FILE: &str = "StanFit.json.gz";

/// Posterior draws of a fitted model: variable name -> array whose
/// first axis indexes draws
///
/// Stored as a JSON object of `ndarray` arrays, gzipped when the file
/// name ends with `.gz`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PosteriorFit {
    variables: BTreeMap<Box<str>, ArrayD<f64>>,
}

impl PosteriorFit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, draws: ArrayD<f64>) -> Option<ArrayD<f64>> {
        self.variables.insert(name.into(), draws)
    }

    /// Draws of `name`, or `MissingKey`
    pub fn get(&self, name: &str) -> Result<&ArrayD<f64>> {
        self.variables
            .get(name)
            .ok_or_else(|| PosteriorError::MissingKey { key: name.into() })
    }

    pub fn variable_names(&self) -> Vec<Box<str>> {
        self.variables.keys().cloned().collect()
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let load_err = |source: Box<dyn std::error::Error + Send + Sync>| PosteriorError::Load {
            path: path.into(),
            source,
        };
        let reader = open_buf_reader(path).map_err(|e| load_err(e.into()))?;
        serde_json::from_reader(reader).map_err(|e| load_err(e.into()))
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        mkdir(path)?;
        let mut writer = open_buf_writer(path)?;
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

/// Where posterior fits come from
pub trait FitSource {
    fn load_fit(&self, model: &str) -> Result<PosteriorFit>;
}

/// Fits kept on disk as `<root>/<model>/<file_name>`
#[derive(Debug, Clone)]
pub struct FitStore {
    pub root: PathBuf,
    pub file_name: Box<str>,
}

impl Default for FitStore {
    fn default() -> Self {
        Self::new(DEFAULT_FIT_DIR, DEFAULT_FIT_FILE)
    }
}

impl FitStore {
    pub fn new(root: impl AsRef<Path>, file_name: &str) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            file_name: file_name.into(),
        }
    }

    pub fn path(&self, model: &str) -> PathBuf {
        self.root.join(model).join(self.file_name.as_ref())
    }

    pub fn save_fit(&self, model: &str, fit: &PosteriorFit) -> anyhow::Result<()> {
        let path = self.path(model);
        let path = path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("non UTF-8 path for model {}", model))?;
        fit.to_file(path)
    }
}

impl FitSource for FitStore {
    fn load_fit(&self, model: &str) -> Result<PosteriorFit> {
        let path = self.path(model);
        let path = path.to_string_lossy();
        info!("Loading posterior fit of {} from {}", model, path);
        PosteriorFit::from_file(&path)
    }
}

impl FitSource for HashMap<Box<str>, PosteriorFit> {
    fn load_fit(&self, model: &str) -> Result<PosteriorFit> {
        self.get(model).cloned().ok_or_else(|| PosteriorError::Load {
            path: model.into(),
            source: format!("no fit registered for model {}", model).into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array, IxDyn};

    fn toy_fit() -> PosteriorFit {
        let mut fit = PosteriorFit::new();
        fit.insert(
            "Y_log_lik",
            Array::from_shape_fn(IxDyn(&[3, 2, 1, 2]), |idx| -((idx[0] + idx[3]) as f64)),
        );
        fit.insert("beta", Array::from_elem(IxDyn(&[3]), 0.5));
        fit
    }

    #[test]
    fn store_round_trip() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = FitStore::new(dir.path(), DEFAULT_FIT_FILE);
        let fit = toy_fit();

        store.save_fit("m1", &fit)?;
        assert!(store.path("m1").ends_with("m1/StanFit.json.gz"));

        let loaded = store.load_fit("m1")?;
        assert_eq!(loaded, fit);
        assert_eq!(
            loaded.variable_names(),
            vec![Box::<str>::from("Y_log_lik"), Box::<str>::from("beta")]
        );
        Ok(())
    }

    #[test]
    fn missing_fit_and_missing_key() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = FitStore::new(dir.path(), "fit.json");
        assert!(matches!(
            store.load_fit("nothing"),
            Err(PosteriorError::Load { .. })
        ));

        let fit = toy_fit();
        assert!(matches!(
            fit.get("M_log_lik"),
            Err(PosteriorError::MissingKey { .. })
        ));
        Ok(())
    }

    #[test]
    fn corrupted_fit_is_a_load_error() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = FitStore::new(dir.path(), "fit.json");
        std::fs::create_dir_all(dir.path().join("bad"))?;
        std::fs::write(store.path("bad"), "{\"Y_log_lik\": [1, 2")?;
        assert!(matches!(
            store.load_fit("bad"),
            Err(PosteriorError::Load { .. })
        ));
        Ok(())
    }
}
