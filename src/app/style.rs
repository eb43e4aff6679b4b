//! Styles of the browser views.

use lipgloss_extras::prelude::*;

pub const BULLET: &str = "•";

pub const ELLIPSIS: &str = "…";

#[derive(Debug, Clone)]
pub struct AppStyles {
    pub title: Style,
    pub filter_label: Style,
    pub filter_value: Style,
    pub filter_prompt: Style,
    pub header: Style,
    pub selected_row: Style,
    pub row: Style,
    pub no_items: Style,
    pub error: Style,
    pub notice: Style,
    pub help: Style,
    pub detail_key: Style,
    pub dialog: Style,
}

impl Default for AppStyles {
    fn default() -> Self {
        let subdued_color = AdaptiveColor {
            Light: "#9B9B9B",
            Dark: "#5C5C5C",
        };

        Self {
            title: Style::new()
                .background(Color::from("62"))
                .foreground(Color::from("230"))
                .padding(0, 1, 0, 1),
            filter_label: Style::new().foreground(subdued_color.clone()),
            filter_value: Style::new().foreground(AdaptiveColor {
                Light: "#1a1a1a",
                Dark: "#dddddd",
            }),
            filter_prompt: Style::new().foreground(AdaptiveColor {
                Light: "#04B575",
                Dark: "#ECFD65",
            }),
            header: Style::new().bold(true).underline(true),
            selected_row: Style::new().foreground(AdaptiveColor {
                Light: "#EE6FF8",
                Dark: "#EE6FF8",
            }),
            row: Style::new(),
            no_items: Style::new().foreground(AdaptiveColor {
                Light: "#909090",
                Dark: "#626262",
            }),
            error: Style::new().foreground(Color::from("#FF5F87")).bold(true),
            notice: Style::new().foreground(AdaptiveColor {
                Light: "#04B575",
                Dark: "#04B575",
            }),
            help: Style::new().foreground(subdued_color),
            detail_key: Style::new().bold(true),
            dialog: Style::new().padding(1, 2, 1, 2),
        }
    }
}
