//! CSS selectors of the diary portal.

pub const LOGIN_ID: &str = "#memberId";
pub const LOGIN_PASSWORD: &str = "#pwd";
pub const LOGIN_BUTTON: &str = "div.btnCon > button.login";

/// "Write diary" link on the main page.
pub const WRITE_LINK: &str = "div.action_box > a[href*='goView'][href*='diaryMain']";

/// Recovery lookups for the write link, most specific first.
pub const WRITE_LINK_EXACT: &str = r#"a[href="javascript:goView('I', 'diaryMain')"]"#;
pub const ANCHORS: &str = "a";
pub const WRITE_LINK_TEXT: &str = "영농일지 등록";
pub const WRITE_LINK_ANY: &str = "a[href*='goView'][href*='diaryMain']";

pub const DETAIL_PAGE_SUFFIX: &str = "diaryDetail.do";

pub const START_DATE: &str = "#now_date_s";
pub const END_DATE: &str = "#now_date_e";
pub const PICKER_YEAR: &str = ".ui-datepicker-year";
pub const PICKER_MONTH: &str = ".ui-datepicker-month";
pub const PICKER_DAYS: &str = ".ui-datepicker-calendar td[data-handler='selectDay'] a";

pub const CROP_SELECT: &str = "#selectCrops";
pub const CROP_OPTIONS: &str = "#selectCrops option";
pub const CROP_SELECTED: &str = "#selectCrops option:checked";
pub const CROP_PLACEHOLDER: &str = "품목선택";

pub const LAND_BOXES: &str = "#checkLand input[type='checkbox']";
pub const LAND_CHECKED: &str = "#checkLand input[type='checkbox']:checked";
pub const VARIETY_BOXES: &str = "#checkScrop input[type='checkbox']";
pub const VARIETY_CHECKED: &str = "#checkScrop input[type='checkbox']:checked";

pub const TASK_SELECT: &str = "#selectTask";
pub const TASK_OPTIONS: &str = "#selectTask option";
pub const TASK_SELECTED: &str = "#selectTask option:checked";
pub const TASK_PLACEHOLDER: &str = "작업단계 선택";

pub const MEMO: &str = "#memo";
pub const SAVE_BUTTON: &str = "#upsert_diary";

pub const WEATHER_CONDITION: &str = "#wfKor";
pub const WEATHER_LOW: &str = "#low_temp";
pub const WEATHER_HIGH: &str = "#high_temp";
pub const WEATHER_RAINFALL: &str = "#r12";
pub const WEATHER_HUMIDITY: &str = "#reh";

pub const HARVEST_AMOUNT: &str = "#amount3";
pub const SEEDING_AMOUNT: &str = "#amount2";
pub const AMOUNT_UNIT: &str = "#unit";
pub const PER_PYEONG_AMOUNT: &str = "#perPyeongAmount";
pub const SEEDBED_AMOUNT: &str = "#seedbedAmount";
