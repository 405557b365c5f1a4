use crate::api::{ApiError, ApiResult, QuestService, QUEST_NAME};
use crate::json;
use crate::store::{CredentialPair, CredentialStore};
use crate::token;
use serde_json::Value;

#[derive(Clone, Debug)]
pub struct AccountResult {
    pub user_id: String,
    pub status: String,
    pub quest_name: Option<String>,
    pub completion_count: Option<u64>,
    pub last_completed: Option<String>,
    pub first_completed: Option<String>,
}

impl AccountResult {
    fn early_exit(user_id: Option<String>, status: &str) -> Self {
        AccountResult {
            user_id: display_id(user_id),
            status: status.to_string(),
            quest_name: None,
            completion_count: None,
            last_completed: None,
            first_completed: None,
        }
    }
}

fn display_id(user_id: Option<String>) -> String {
    user_id.unwrap_or_else(|| String::from("Unknown"))
}

// One account, one cycle: refresh the token if it's about to lapse, mark the
// daily check complete, then read back the quest summary. Every failure is
// captured in the result status; nothing here aborts the run.
pub fn process_account(
    service: &dyn QuestService,
    store: &CredentialStore,
    pair: &CredentialPair,
) -> AccountResult {
    let mut current_token = pair.access_token.clone();
    let report_id = token::subject_id(&current_token);

    if token::is_expired(&current_token) {
        println!("  Token expired, refreshing...");
        match service.refresh_access_token(&pair.refresh_token) {
            Some(new_token) => {
                match store.update_access_token(pair.index, &new_token) {
                    Ok(()) => println!("  ✓ Token file updated"),
                    Err(e) => println!("  ✗ Error updating token file: {}", e),
                }
                current_token = new_token;
            }
            None => return AccountResult::early_exit(report_id, "Token refresh failed"),
        }
    }

    // API calls are keyed by the working token's subject, which may differ
    // from the reporting id after a refresh.
    let user_id = match token::subject_id(&current_token) {
        Some(user_id) => user_id,
        None => {
            return AccountResult::early_exit(
                report_id,
                "Error: Could not extract user ID from token",
            )
        }
    };

    println!("  Completing daily check...");
    let completion = service.complete_quest(&current_token, &user_id);
    if let Err(ApiError::Unauthorized) = completion {
        println!("  Daily check failed: Unauthorized");
        return AccountResult::early_exit(report_id, "Unauthorized - Please check tokens");
    }

    println!("  Fetching quest summary...");
    match service.quest_summary(&current_token, &user_id) {
        Ok(summary) => summarize(report_id, &completion, &summary),
        Err(e) => AccountResult::early_exit(report_id, &format!("Error: {}", e.message())),
    }
}

fn summarize(report_id: Option<String>, completion: &ApiResult, summary: &Value) -> AccountResult {
    let entries: &[Value] = summary.as_array().map(Vec::as_slice).unwrap_or(&[]);

    for quest in entries {
        if json::attribute_from_value(quest, "questName").as_deref() == Some(QUEST_NAME) {
            let status = if completion.is_ok() {
                "Success"
            } else {
                // Legacy label kept verbatim, inverted wording and all.
                "Check completed but summary failed"
            };
            return AccountResult {
                user_id: display_id(report_id),
                status: status.to_string(),
                quest_name: Some(String::from(QUEST_NAME)),
                completion_count: Some(quest["completionCount"].as_u64().unwrap_or(0)),
                last_completed: Some(json::display_timestamp(quest, "lastCompletedAt")),
                first_completed: Some(json::display_timestamp(quest, "firstCompletedAt")),
            };
        }
    }

    AccountResult {
        user_id: display_id(report_id),
        status: String::from("Daily check not found in profile"),
        quest_name: Some(String::from(QUEST_NAME)),
        completion_count: Some(0),
        last_completed: Some(String::from("Never")),
        first_completed: Some(String::from("Never")),
    }
}
