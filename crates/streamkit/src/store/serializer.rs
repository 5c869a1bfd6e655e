use std::io::{Read, Write};

use serde::{Serialize, de::DeserializeOwned};

use super::StoreError;

/// A pluggable document format.
pub trait DataSerializer {
    /// File extension, without the dot, conventionally used for this format.
    fn extension(&self) -> &'static str;

    /// Writes `data` to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` cannot be represented in this format or the
    /// writer fails.
    fn serialize<T, W>(&self, writer: W, data: &T) -> Result<(), StoreError>
    where
        T: Serialize + ?Sized,
        W: Write;

    /// Reads a `T` from `reader`.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader fails or its contents are not a valid
    /// `T` in this format.
    fn deserialize<T, R>(&self, reader: R) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
        R: Read;
}

/// JSON documents via `serde_json`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    /// Human-readable, indented output.
    pub const fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Single-line output.
    pub const fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonSerializer {
    fn default() -> Self {
        Self::pretty()
    }
}

impl DataSerializer for JsonSerializer {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn serialize<T, W>(&self, writer: W, data: &T) -> Result<(), StoreError>
    where
        T: Serialize + ?Sized,
        W: Write,
    {
        if self.pretty {
            serde_json::to_writer_pretty(writer, data)?;
        } else {
            serde_json::to_writer(writer, data)?;
        }
        Ok(())
    }

    fn deserialize<T, R>(&self, reader: R) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
        R: Read,
    {
        Ok(serde_json::from_reader(reader)?)
    }
}

/// TOML documents via `toml`.
#[cfg_attr(docsrs, doc(cfg(feature = "toml")))]
#[cfg(feature = "toml")]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TomlSerializer;

#[cfg(feature = "toml")]
impl DataSerializer for TomlSerializer {
    fn extension(&self) -> &'static str {
        "toml"
    }

    fn serialize<T, W>(&self, mut writer: W, data: &T) -> Result<(), StoreError>
    where
        T: Serialize + ?Sized,
        W: Write,
    {
        let text = toml::to_string_pretty(data)?;
        writer.write_all(text.as_bytes())?;
        Ok(())
    }

    fn deserialize<T, R>(&self, mut reader: R) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
        R: Read,
    {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(toml::from_str(&text)?)
    }
}
