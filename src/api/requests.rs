use crate::games::game::Mode;
use crate::games::lifecycle::HistoryFilter;
use crate::theme::ThemeEvent;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct PreviewQuery {
    pub mode: Mode,
    pub amount: i64,
}

#[derive(Deserialize, Debug)]
pub struct TimerQuery {
    pub id: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    #[serde(default)]
    pub extra_minutes: i64,
}

#[derive(Deserialize, Debug)]
pub struct MinutesRequest {
    pub minutes: i64,
}

#[derive(Deserialize, Debug)]
pub struct HistoryQuery {
    #[serde(default)]
    pub filter: HistoryFilter,
}

#[derive(Deserialize, Debug)]
pub struct EvaluateRequest {
    pub expression: String,
}

#[derive(Deserialize, Debug)]
pub struct KeyRequest {
    pub key: String,
}

#[derive(Deserialize, Debug)]
pub struct FunctionRequest {
    pub name: String,
}

#[derive(Deserialize, Debug)]
pub struct ToggleRequest {
    pub event: ThemeEvent,
}

#[derive(Deserialize, Debug)]
pub struct ClickRequest {
    pub action: Option<String>,
}
