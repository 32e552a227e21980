//! Object storage: the upload seam and its S3 implementation.

use std::{fs::File, path::Path};

use anyhow::{Context, Result, anyhow};
use log::debug;
use s3::{Bucket, Region, creds::Credentials};

use crate::{errors::LoadError, settings::StorageSettings};

/// Uploads a local file to object storage under the given key.
pub trait ObjectStore {
    fn upload(&self, local: &Path, key: &str) -> Result<()>;
}

pub struct S3Store {
    bucket: Box<Bucket>,
}

impl S3Store {
    pub fn new(settings: &StorageSettings) -> Result<Self> {
        let region = match settings.region.as_deref() {
            Some(name) => name
                .parse::<Region>()
                .map_err(|_| anyhow!("Unrecognized region '{name}'"))?,
            None => Region::UsEast1,
        };
        let credentials = Credentials::new(
            Some(&settings.access_key),
            Some(&settings.secret_key),
            None,
            None,
            None,
        )
        .context("Building storage credentials")?;
        let bucket = Bucket::new(&settings.bucket, region, credentials)
            .with_context(|| format!("Opening bucket '{}'", settings.bucket))?;
        Ok(Self {
            bucket: Box::new(bucket),
        })
    }
}

impl ObjectStore for S3Store {
    fn upload(&self, local: &Path, key: &str) -> Result<()> {
        let mut file =
            File::open(local).with_context(|| format!("Opening upload source {local:?}"))?;
        let response = self
            .bucket
            .put_object_stream(&mut file, key)
            .map_err(|source| LoadError::StorageUploadFailed {
                key: key.to_string(),
                source,
            })?;
        debug!("Uploaded '{key}' (status {response})");
        Ok(())
    }
}
