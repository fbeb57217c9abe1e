use log::info;
use serde::Serialize;

pub const ICON: &str = "/icons/icon-192.png";
pub const BADGE: &str = "/icons/icon-96.png";
pub const APP_ENTRY: &str = "/index.html";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationData {
    pub game_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub tag: String,
    pub vibrate: Vec<u32>,
    pub silent: bool,
    pub require_interaction: bool,
    pub data: NotificationData,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<NotificationAction>,
}

impl Notification {
    pub fn warning_tag(game_id: &str) -> String {
        format!("{game_id}_warn")
    }

    /// Sent five minutes before the end.
    pub fn warning(game_id: &str, team_name: &str) -> Self {
        Notification {
            title: String::from("⚠️ Vaqt tugayapti!"),
            body: format!("{team_name} — 5 daqiqa qoldi!"),
            icon: ICON.to_string(),
            badge: BADGE.to_string(),
            tag: Self::warning_tag(game_id),
            vibrate: vec![200, 100, 200],
            silent: false,
            require_interaction: false,
            data: NotificationData {
                game_id: game_id.to_string(),
            },
            actions: Vec::new(),
        }
    }

    pub fn completion(game_id: &str, team_name: &str) -> Self {
        Notification {
            title: String::from("🏁 O'yin Tugadi!"),
            body: format!("{team_name} — vaqt tugadi! Maydonga chiqing."),
            icon: ICON.to_string(),
            badge: BADGE.to_string(),
            tag: game_id.to_string(),
            vibrate: vec![400, 200, 400, 200, 400, 200, 800],
            silent: false,
            require_interaction: true,
            data: NotificationData {
                game_id: game_id.to_string(),
            },
            actions: vec![
                NotificationAction {
                    action: String::from("open"),
                    title: String::from("📱 Ochish"),
                },
                NotificationAction {
                    action: String::from("dismiss"),
                    title: String::from("Yopish"),
                },
            ],
        }
    }
}

/// Where a notification click should lead. `dismiss` just closes it.
pub fn click_target(action: Option<&str>) -> Option<&'static str> {
    match action {
        Some("dismiss") => None,
        _ => Some(APP_ENTRY),
    }
}

pub trait Notifier: Send + Sync {
    fn show(&self, notification: Notification);
}

/// Writes notifications to the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show(&self, notification: Notification) {
        let payload = serde_json::to_string(&notification).unwrap_or_default();
        info!("Notification '{}': {}", notification.tag, payload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_has_actions() {
        let notification = Notification::completion("g_1", "Pakhtakor");
        let actions: Vec<&str> = notification
            .actions
            .iter()
            .map(|a| a.action.as_str())
            .collect();

        assert_eq!(actions, vec!["open", "dismiss"]);
        assert!(notification.require_interaction);
        assert_eq!(notification.tag, "g_1");
    }

    #[test]
    fn test_warning_payload() {
        let json = serde_json::to_value(Notification::warning("g_1", "Pakhtakor")).unwrap();

        assert_eq!(json["tag"], "g_1_warn");
        assert_eq!(json["body"], "Pakhtakor — 5 daqiqa qoldi!");
        assert_eq!(json["requireInteraction"], false);
        assert_eq!(json["data"]["gameId"], "g_1");
        assert!(json.get("actions").is_none());
    }

    #[test]
    fn test_click_target() {
        assert_eq!(click_target(Some("dismiss")), None);
        assert_eq!(click_target(Some("open")), Some("/index.html"));
        assert_eq!(click_target(None), Some("/index.html"));
    }
}
