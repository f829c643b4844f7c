//! Seasonal basic-management content for weeks without a scheduled task.

use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Winter,
    Spring,
    EarlySummer,
    Summer,
    Autumn,
    LateAutumn,
}

impl Season {
    pub fn from_month(month: u32) -> Self {
        match month {
            3 | 4 => Season::Spring,
            5 | 6 => Season::EarlySummer,
            7 | 8 => Season::Summer,
            9 | 10 => Season::Autumn,
            11 => Season::LateAutumn,
            _ => Season::Winter,
        }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::from_month(date.month())
    }

    pub fn label(&self) -> &'static str {
        match self {
            Season::Winter => "겨울철",
            Season::Spring => "봄철",
            Season::EarlySummer => "초여름",
            Season::Summer => "여름철",
            Season::Autumn => "가을철",
            Season::LateAutumn => "늦가을",
        }
    }

    /// Headline activity used in the prompt.
    fn focus(&self) -> &'static str {
        self.entries()[0].0
    }

    /// `(headline, body)` pairs for the static templates.
    fn entries(&self) -> [(&'static str, &'static str); 3] {
        match self {
            Season::Winter => [
                ("토양 상태 점검 및 겨울철 준비 작업", "논갈이 준비 중이며 내년 작기 준비를 위해 정리 작업을 진행했습니다."),
                ("토양 동결 상태 확인 및 겨울철 보호 작업", "논의 동결 상태를 점검하고 겨울철 보호 작업을 진행했습니다."),
                ("농기구 정비 및 내년 계획 수립", "농기구 정비를 완료하고 내년 작기 계획을 수립했습니다."),
            ],
            Season::Spring => [
                ("파종 준비 및 토양 상태 점검", "논갈이 작업 완료 후 파종 준비를 위해 토양 상태를 확인했습니다."),
                ("논갈이 작업 및 비료 준비", "봄철 논갈이 작업을 진행하고 파종을 위한 비료를 준비했습니다."),
                ("논 정리 및 파종 준비", "논을 정리하고 파종을 위한 최종 준비를 완료했습니다."),
            ],
            Season::EarlySummer => [
                ("모내기 후 생육 상태 점검", "이앙 작업 완료 후 모의 생육 상태를 확인하고 물관리를 진행했습니다."),
                ("모 생육 관리 및 물관리", "모의 생육 상태가 양호하며 적절한 물관리를 진행했습니다."),
                ("모 적응 상태 점검 및 관리", "모의 적응 상태를 점검하고 생육에 필요한 관리 작업을 진행했습니다."),
            ],
            Season::Summer => [
                ("생육 관리 및 병해충 점검", "벼 생육이 양호하며 병해충 발생 여부를 정기적으로 점검하고 있습니다."),
                ("생육 촉진 및 병해충 방제", "벼 생육을 촉진하고 병해충 방제 작업을 진행했습니다."),
                ("생육 상태 점검 및 물관리", "벼 생육 상태를 점검하고 적절한 물관리를 진행했습니다."),
            ],
            Season::Autumn => [
                ("수확 준비 및 완숙도 점검", "벼가 완숙기에 접어들어 수확 준비를 위해 상태를 점검했습니다."),
                ("완숙도 확인 및 수확 준비", "벼의 완숙도를 확인하고 수확 준비 작업을 진행했습니다."),
                ("수확 시기 결정 및 준비", "최적의 수확 시기를 결정하고 수확 준비를 완료했습니다."),
            ],
            Season::LateAutumn => [
                ("수확 후 정리 작업", "수확 작업 완료 후 논 정리 및 내년 준비를 위한 작업을 진행했습니다."),
                ("논 정리 및 내년 준비", "수확 후 논을 정리하고 내년 작기를 위한 준비 작업을 진행했습니다."),
                ("농기구 정리 및 보관", "사용한 농기구를 정리하고 보관 작업을 완료했습니다."),
            ],
        }
    }

    /// The three static entries, rendered for `date` with `weather_info`
    /// placed after the headline.
    pub fn templates(&self, date: NaiveDate, weather_info: &str) -> Vec<String> {
        self.entries()
            .iter()
            .map(|(headline, body)| {
                format!(
                    "{} {} 논 관리. {}.{} {}",
                    date,
                    self.label(),
                    headline,
                    weather_info,
                    body
                )
            })
            .collect()
    }

    /// Prompt asking for varied basic-management content.
    pub fn prompt(&self, date: NaiveDate, weather_info: &str) -> String {
        format!(
            "{} {} 논 관리. {}.{} 다양한 {} 논 관리 활동을 100자 이내로 작성해주세요.",
            date,
            self.label(),
            self.focus(),
            weather_info,
            self.label()
        )
    }
}
