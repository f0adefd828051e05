use std::fs;

use fractic_server_error::ServerError;
use ron::from_str;

use crate::{
    entities::{LedgerConfig, RoomLayout, RoomSpec},
    errors::{InvalidRon, ReadError},
};

#[derive(Debug, serde_derive::Deserialize)]
struct RoomLayoutModel {
    rooms: Vec<RoomSpecModel>,
}

#[derive(Debug, serde_derive::Deserialize)]
struct RoomSpecModel {
    id: String,
    floor: String,
    total_beds: usize,
    #[serde(default)]
    bookable_as_room: bool,
    #[serde(default)]
    default_rent: Option<f64>,
}

impl Into<RoomLayout> for RoomLayoutModel {
    fn into(self) -> RoomLayout {
        RoomLayout {
            rooms: self
                .rooms
                .into_iter()
                .map(|r| RoomSpec {
                    id: r.id,
                    floor: r.floor,
                    total_beds: r.total_beds,
                    bookable_as_room: r.bookable_as_room,
                    default_rent: r.default_rent,
                })
                .collect(),
        }
    }
}

/// Hand-written installation inputs (room layout, settings) in RON.
pub(crate) trait RonDatasource {
    fn layout_from_string(&self, s: &str) -> Result<RoomLayout, ServerError>;

    fn layout_from_file<P>(&self, path: P) -> Result<RoomLayout, ServerError>
    where
        P: AsRef<std::path::Path>;

    fn config_from_string(&self, s: &str) -> Result<LedgerConfig, ServerError>;

    fn config_from_file<P>(&self, path: P) -> Result<LedgerConfig, ServerError>
    where
        P: AsRef<std::path::Path>;
}

pub(crate) struct RonDatasourceImpl;

impl RonDatasourceImpl {
    pub(crate) fn new() -> Self {
        Self
    }
}

impl RonDatasource for RonDatasourceImpl {
    fn layout_from_string(&self, s: &str) -> Result<RoomLayout, ServerError> {
        let model: RoomLayoutModel =
            from_str(s).map_err(|e| InvalidRon::with_debug("RoomLayout", &e))?;
        Ok(model.into())
    }

    fn layout_from_file<P>(&self, path: P) -> Result<RoomLayout, ServerError>
    where
        P: AsRef<std::path::Path>,
    {
        self.layout_from_string(&fs::read_to_string(path).map_err(|e| ReadError::with_debug(&e))?)
    }

    fn config_from_string(&self, s: &str) -> Result<LedgerConfig, ServerError> {
        from_str(s).map_err(|e| InvalidRon::with_debug("LedgerConfig", &e))
    }

    fn config_from_file<P>(&self, path: P) -> Result<LedgerConfig, ServerError>
    where
        P: AsRef<std::path::Path>,
    {
        self.config_from_string(&fs::read_to_string(path).map_err(|e| ReadError::with_debug(&e))?)
    }
}
