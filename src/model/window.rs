use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{comet::FlybyDto, generation::GenerationStatusDto};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SummaryDto {
    pub id: i32,
    pub title: String,
    pub body: String,
    pub image_url: Option<String>,
    pub model: String,
    pub generated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct WindowDto {
    /// Canonical window key, `{low flyby id}-{high flyby id}`
    pub key: String,
    pub earlier: FlybyDto,
    pub later: FlybyDto,
    pub summary: Option<SummaryDto>,
    pub selected: bool,
}

/// Session view of a comet: its flyby windows, cached summaries and generation state
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CometWindowsDto {
    pub comet_id: i32,
    pub designation: String,
    pub windows: Vec<WindowDto>,
    pub selected_window: Option<String>,
    pub generation: GenerationStatusDto,
}
