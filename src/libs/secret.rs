//! Encrypted on-disk secrets.
//!
//! The bearer token handed out by the ihsan server is kept in the data
//! directory, AES-256-CBC encrypted with the keys `build.rs` embeds into the
//! binary. Passwords are only ever prompted for, never written.

use super::data_storage::DataStorage;
use aes::Aes256;
use anyhow::Result;
use base64::prelude::*;
use block_modes::block_padding::Pkcs7;
use block_modes::{BlockMode, Cbc};
use dialoguer::{theme::ColorfulTheme, Password};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::PathBuf;

// Include generated metadata with encryption keys
include!(concat!(env!("OUT_DIR"), "/app_metadata.rs"));

type Aes256Cbc = Cbc<Aes256, Pkcs7>;

#[derive(Clone, Debug)]
pub struct Secret {
    prompt: String,
    secret_file_path: PathBuf,
    key: Vec<u8>,
    iv: Vec<u8>,
}

impl Secret {
    pub fn new(secret_name: &str, prompt: &str) -> Self {
        let key = APP_METADATA_ENCRYPTION_KEY.to_vec();
        let iv = APP_METADATA_ENCRYPTION_IV.to_vec();

        let secret_file_path = DataStorage::new().get_path(secret_name).unwrap_or_else(|_| PathBuf::from(secret_name));

        Self {
            secret_file_path,
            prompt: prompt.to_owned(),
            key,
            iv,
        }
    }

    pub fn exists(&self) -> bool {
        fs::metadata(&self.secret_file_path).is_ok()
    }

    /// Reads and decrypts the stored value.
    pub fn read(&self) -> Result<String> {
        let mut file = File::open(&self.secret_file_path)?;
        let mut encoded = String::new();
        file.read_to_string(&mut encoded)?;
        let ciphertext = BASE64_STANDARD.decode(encoded.trim())?;
        let cipher = Aes256Cbc::new_from_slices(&self.key, &self.iv)?;
        let plaintext = cipher.decrypt_vec(&ciphertext)?;

        Ok(String::from_utf8(plaintext)?)
    }

    /// Encrypts and stores `value`, replacing any previous one.
    pub fn write(&self, value: &str) -> Result<()> {
        let cipher = Aes256Cbc::new_from_slices(&self.key, &self.iv)?;
        let ciphertext = cipher.encrypt_vec(value.as_bytes());
        let encoded = BASE64_STANDARD.encode(&ciphertext);

        if let Some(parent) = self.secret_file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = File::create(&self.secret_file_path)?;
        file.write_all(encoded.as_bytes())?;
        Ok(())
    }

    /// Deletes the stored value. A missing file is not an error.
    pub fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.secret_file_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Interactive hidden prompt. The answer is not persisted.
    pub fn prompt(&self) -> Result<String> {
        Ok(Password::with_theme(&ColorfulTheme::default()).with_prompt(&self.prompt).interact()?)
    }
}
