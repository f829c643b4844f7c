//! Static per-task diary templates.

const ELLIPSIS: &str = "...";

/// `(task, body)` pairs. `{crop}` is replaced by the crop name.
const TASK_TEMPLATES: &[(&str, &str)] = &[
    ("씨뿌리기", "{crop} 씨뿌리기 작업을 진행했습니다. 토양 상태를 확인하고 적절한 깊이로 씨를 뿌렸습니다."),
    ("모내기", "{crop} 모내기 작업을 완료했습니다. 모의 상태가 양호하여 정식 작업을 진행했습니다."),
    ("비료주기", "{crop} 비료주기 작업을 실시했습니다. 작물 생육에 필요한 영양분을 공급했습니다."),
    ("농약살포", "{crop} 농약살포 작업을 진행했습니다. 병해충 방제를 위해 적절한 농약을 살포했습니다."),
    ("물관리", "{crop} 물관리 작업을 실시했습니다. 작물 생육에 적합한 수분을 유지하도록 관리했습니다."),
    ("수확", "{crop} 수확 작업을 완료했습니다. 적절한 시기에 수확하여 품질을 확보했습니다."),
    ("파종작업", "{crop} 파종작업을 진행했습니다. 토양 상태를 확인하고 적절한 깊이로 종자를 파종했습니다."),
    ("볍씨소독작업", "{crop} 볍씨소독작업을 실시했습니다. 종자 소독을 통해 병해충을 예방했습니다."),
    ("이앙작업", "{crop} 이앙작업을 완료했습니다. 모의 상태가 양호하여 정식 작업을 진행했습니다."),
    ("비료작업", "{crop} 비료작업을 실시했습니다. 작물 생육에 필요한 영양분을 공급했습니다."),
    ("방제작업", "{crop} 방제작업을 진행했습니다. 병해충 방제를 위해 적절한 농약을 살포했습니다."),
    ("중간물떼기", "{crop} 중간물떼기 작업을 실시했습니다. 작물 생육에 적합한 수분을 유지하도록 관리했습니다."),
    ("완전물떼기", "{crop} 완전물떼기 작업을 완료했습니다. 수확 전 적절한 시기에 물을 완전히 뗐습니다."),
    ("수확작업", "{crop} 수확작업을 완료했습니다. 적절한 시기에 수확하여 품질을 확보했습니다."),
    ("출하/판매작업", "{crop} 출하/판매작업을 진행했습니다. 수확한 작물을 정리하여 출하 준비를 완료했습니다."),
    ("건조작업", "{crop} 건조작업을 실시했습니다. 수확한 작물을 적절한 수분으로 건조했습니다."),
    ("병해충 피해", "{crop} 병해충 피해 상황을 확인했습니다. 피해 정도를 파악하고 대응 방안을 마련했습니다."),
    ("제초작업", "{crop} 제초작업을 진행했습니다. 잡초를 제거하여 작물 생육 환경을 개선했습니다."),
    ("논갈이(쟁기)작업", "{crop} 논갈이(쟁기)작업을 실시했습니다. 토양을 갈아엎어 작물 재배 환경을 준비했습니다."),
    ("치상작업", "{crop} 치상작업을 진행했습니다. 모를 키우기 위한 치상 작업을 완료했습니다."),
    ("로터리작업", "{crop} 로터리작업을 실시했습니다. 토양을 부숴서 작물 재배에 적합한 환경을 만들었습니다."),
    ("작기종료", "{crop} 작기종료 작업을 완료했습니다. 이번 작기의 모든 작업을 마무리했습니다."),
    ("기타작업", "{crop} 기타작업을 진행했습니다. 농장 관리에 필요한 추가 작업을 실시했습니다."),
    ("교육일정", "{crop} 교육일정에 참여했습니다. 농업 기술 향상을 위한 교육을 받았습니다."),
    ("예찰활동", "{crop} 예찰활동을 진행했습니다. 병해충 발생 상황을 모니터링했습니다."),
];

/// Template text for `task`, keyed by exact name, with `crop` filled in.
/// Unknown tasks get a one-sentence default.
pub fn template_for(task: &str, crop: &str) -> String {
    TASK_TEMPLATES
        .iter()
        .find(|(name, _)| *name == task)
        .map(|(_, body)| body.replace("{crop}", crop))
        .unwrap_or_else(|| format!("{} {} 작업을 진행했습니다.", crop, task))
}

/// Cut `text` to at most `max_chars` characters, ending in `...` when cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}
