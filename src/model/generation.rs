use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::window::SummaryDto;

/// Request to generate the summary of one flyby window
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct GenerateSummaryDto {
    pub comet_id: Option<i32>,
    pub previous_flyby_id: Option<i32>,
    pub next_flyby_id: Option<i32>,
    /// Optional thematic focus for the narrative
    pub focus: Option<String>,
    /// Also generate an illustration for the summary
    #[serde(default)]
    pub with_image: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GenerationPhaseDto {
    Idle,
    Requesting,
    Polling,
    Succeeded,
    Failed,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerationStatusDto {
    pub phase: GenerationPhaseDto,
    pub window: Option<String>,
    pub attempt: Option<u32>,
    pub max_attempts: Option<u32>,
    pub summary_id: Option<i32>,
    /// Failure category: input, data_fetch, generation or write_back
    pub failure: Option<String>,
    /// Human readable status line
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GenerationOutcomeDto {
    Started,
    AlreadySummarized,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerationResponseDto {
    pub outcome: GenerationOutcomeDto,
    pub status: GenerationStatusDto,
    pub summary: Option<SummaryDto>,
}
