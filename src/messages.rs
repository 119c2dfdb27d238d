//! User-facing strings for the single supported locale (he-IL).

pub const FIELD_REQUIRED: &str = "שדה חובה";
pub const FILL_REQUIRED_FIELDS: &str = "נא למלא את כל השדות הנדרשים";
pub const PARENT_RESULTS_READY: &str = "מצאנו לכם התאמות מעולות! 🎉";
pub const THERAPIST_REGISTERED: &str = "ההרשמה הושלמה בהצלחה! 🎉";
pub const FLOW_RESTARTED: &str = "התהליך אופס. תוכלו להתחיל מחדש";
pub const NOT_RELEVANT_FEEDBACK: &str = "תודה על המשוב! נשתפר";
pub const MATCH_SAVED: &str = "נשמר להמשך";
pub const MATCH_UNSAVED: &str = "הוסר מהשמורים";
pub const CATEGORY_LIMIT: &str = "ניתן לבחור עד 3 תחומים";
pub const CATEGORY_TAKEN: &str = "התחום כבר נבחר";
pub const SLOT_UNAVAILABLE: &str = "המועד אינו פנוי, נא לבחור מועד אחר";
pub const BOOKING_EMAIL_SENT: &str = "התור נקבע בהצלחה! נשלח אישור במייל";
pub const POLICY_UPLOADED: &str = "פוליסה הועלתה";
pub const POLICY_NOT_UPLOADED: &str = "לא הועלה קובץ";
pub const CONSENT_REQUIRED: &str = "יש לסמן הסכמה לניתוח הפוליסה";
pub const POLICY_REQUIRED: &str = "יש להעלות קובץ פוליסה תחילה";
pub const ANALYSIS_RUNNING: &str = "מנתח...";
pub const ANALYSIS_DONE: &str = "ניתוח הפוליסה הושלם! 📊";
pub const NO_POLICY_SENT: &str = "הבקשה נשלחה בהצלחה! נחזור אליכם בקרוב";

pub fn view_opened(name: &str) -> String {
    format!("עברת ל{}", name)
}

pub fn progress(step: u8, total: u8) -> String {
    format!("שלב {} מתוך {}", step, total)
}

pub fn file_uploaded(name: &str) -> String {
    format!("הקובץ {} הועלה בהצלחה", name)
}

pub fn file_too_large(name: &str, limit: &str) -> String {
    format!("הקובץ {} גדול מדי (מקסימום {})", name, limit)
}

pub fn file_removed(name: &str) -> String {
    format!("הקובץ {} הוסר", name)
}

pub fn policy_loaded(name: &str) -> String {
    format!("הקובץ \"{}\" נטען בהצלחה ✅", name)
}

pub fn booking_requested(therapist: &str) -> String {
    format!("שולח בקשת תור אצל {}... ✅", therapist)
}
