//! i18n - Internationalization Module
//!
//! Simple key lookups backed by a static HashMap of (en, zh) pairs.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Supported locales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    /// English (US)
    EnUS,
    /// Chinese (Simplified)
    #[default]
    ZhCN,
}

impl Locale {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Locale::EnUS => "English",
            Locale::ZhCN => "中文",
        }
    }

    /// Map a language tag ("en", "en-US", "zh_CN") to a locale
    pub fn from_tag(tag: &str) -> Option<Self> {
        let lang = tag
            .split(['-', '_'])
            .next()
            .unwrap_or(tag)
            .trim()
            .to_ascii_lowercase();
        match lang.as_str() {
            "en" => Some(Locale::EnUS),
            "zh" => Some(Locale::ZhCN),
            _ => None,
        }
    }

    /// Configured locale, else the OS locale, else Chinese
    pub fn detect(configured: Option<&str>) -> Self {
        if let Some(locale) = configured.filter(|l| !l.is_empty()).and_then(Self::from_tag) {
            return locale;
        }
        let current = locale_config::Locale::current().to_string();
        let lang = current.split_once('-').map_or(current.as_str(), |(lang, _)| lang);
        Self::from_tag(lang).unwrap_or_default()
    }
}

/// Translation resources
static TRANSLATIONS: OnceLock<HashMap<&'static str, (&'static str, &'static str)>> = OnceLock::new();

/// Initialize translations (key -> (en, zh))
fn init_translations() -> HashMap<&'static str, (&'static str, &'static str)> {
    let mut map = HashMap::new();

    // Form
    map.insert("form-create", ("Create System", "创建系统"));
    map.insert("form-update", ("Save Update", "保存更新"));
    map.insert("validation-id-required", ("System ID is required", "系统 ID 不能为空"));
    map.insert("validation-name-required", ("System name is required", "系统名称不能为空"));

    // Datasets
    map.insert("chart-forecast-radiation", ("Forecast radiation (W/m²)", "预报辐射 (W/m²)"));
    map.insert("chart-measured-radiation", ("Measured radiation (W/m²)", "实测辐射 (W/m²)"));
    map.insert("chart-air-temperature", ("Air temperature (°C)", "气温 (°C)"));
    map.insert("chart-irradiance", ("Total irradiance (W/m²)", "总辐射 (W/m²)"));
    map.insert("chart-device-temperature", ("Device temperature (°C)", "设备温度 (°C)"));

    // Table columns
    map.insert("col-index", ("#", "序号"));
    map.insert("col-system-id", ("System ID", "系统ID"));
    map.insert("col-name", ("Name", "名称"));
    map.insert("col-capacity", ("Capacity (kW)", "容量(kW)"));
    map.insert("col-panels", ("Panels", "组件数"));
    map.insert("col-inverter", ("Inverter", "逆变器"));
    map.insert("col-location", ("Location", "位置"));
    map.insert("col-status", ("Status", "状态"));
    map.insert("col-record-time", ("Recorded at", "记录时间"));
    map.insert("col-irradiance", ("Irradiance (W/m²)", "总辐射(W/m²)"));
    map.insert("col-temperature", ("Device temp (°C)", "设备温度(°C)"));
    map.insert("status-active", ("Active", "运行中"));
    map.insert("status-inactive", ("Inactive", "已停用"));

    // Table
    map.insert("table-no-systems", ("No systems", "暂无系统数据"));
    map.insert("table-no-measurements", ("No measurements for this date", "该日期暂无测量数据"));
    map.insert("table-loading", ("Loading...", "加载中..."));
    map.insert("table-load-failed", ("Failed to load: {error}", "加载失败: {error}"));
    map.insert("pager-prev", ("Prev", "上一页"));
    map.insert("pager-next", ("Next", "下一页"));
    map.insert("pager-info", ("Page {page} of {total}", "第 {page}/{total} 页"));

    // Notices
    map.insert("notice-created", ("System created", "系统创建成功"));
    map.insert("notice-updated", ("System updated", "系统更新成功"));
    map.insert("notice-deleted", ("System {id} deleted", "系统 {id} 已删除"));
    map.insert("notice-delete-cancelled", ("Delete cancelled", "已取消删除"));
    map.insert(
        "confirm-delete",
        ("Delete system {id}? This cannot be undone.", "确定要删除系统 {id} 吗？此操作不可恢复。"),
    );
    map.insert("notice-request-failed", ("Request failed: {error}", "请求失败: {error}"));
    map.insert("export-empty", ("No data to export", "没有可导出的数据"));
    map.insert("export-done", ("Exported to {path}", "已导出到 {path}"));

    // Weather
    map.insert("weather-radiation", ("Radiation", "辐射"));
    map.insert("weather-cloud-cover", ("Cloud cover", "云量"));
    map.insert("weather-temperature", ("Temperature", "温度"));
    map.insert("weather-wind-speed", ("Wind speed", "风速"));
    map.insert("weather-updated", ("Last updated", "最后更新"));
    map.insert("weather-select-system", ("Select a system", "请选择系统"));
    map.insert(
        "weather-measured-unavailable",
        ("Measured radiation unavailable: {error}", "实测辐射数据获取失败: {error}"),
    );
    map.insert(
        "weather-watch-help",
        ("Commands: select <id> | refresh | quit", "命令: select <系统ID> | refresh | quit"),
    );

    // Systems detail
    map.insert("energy-estimate", ("Estimated daily energy", "预计日发电量"));

    map
}

/// Get translations
fn translations() -> &'static HashMap<&'static str, (&'static str, &'static str)> {
    TRANSLATIONS.get_or_init(init_translations)
}

/// Translate a key
pub fn t(locale: Locale, key: &str) -> String {
    if let Some(&(en, zh)) = translations().get(key) {
        match locale {
            Locale::EnUS => en.to_string(),
            Locale::ZhCN => zh.to_string(),
        }
    } else {
        // Fallback: return the key itself
        key.to_string()
    }
}

/// Translate a key and fill `{name}` placeholders
pub fn t_with(locale: Locale, key: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(t(locale, key), |text, (name, value)| {
        text.replace(&format!("{{{name}}}"), value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_fallback() {
        assert_eq!(t(Locale::ZhCN, "form-create"), "创建系统");
        assert_eq!(t(Locale::EnUS, "form-update"), "Save Update");
        assert_eq!(t(Locale::ZhCN, "no-such-key"), "no-such-key");
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(
            t_with(Locale::EnUS, "pager-info", &[("page", "2"), ("total", "5")]),
            "Page 2 of 5"
        );
    }

    #[test]
    fn test_from_tag() {
        assert_eq!(Locale::from_tag("en-US"), Some(Locale::EnUS));
        assert_eq!(Locale::from_tag("zh_CN"), Some(Locale::ZhCN));
        assert_eq!(Locale::from_tag("fr"), None);
        assert_eq!(Locale::detect(Some("en")), Locale::EnUS);
    }
}
