use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::date_utils::YearMonth;
use crate::error::{AppError, AppResult};
use crate::models::{
    Category, ExpenditureRecord, ExpenditureUpdate, MonthlyPlan, NewCategory, NewExpenditure,
    TokenPair,
};

/// JSON client for the budget backend.
#[derive(Clone)]
pub struct BudgetApi {
    client: Client,
    base_url: String,
    access_token: Option<String>,
}

#[derive(Serialize)]
struct YmBody {
    ym: YearMonth,
}

#[derive(Serialize)]
struct PlanBody {
    ym: YearMonth,
    amount: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryListBody {
    include_inactive: bool,
}

#[derive(Serialize)]
struct IdBody {
    id: i64,
}

#[derive(Deserialize)]
struct PlanResponse {
    ym: Option<YearMonth>,
    amount: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MonthSpendsResponse {
    #[serde(default)]
    spend_detail_res_list: Vec<ExpenditureRecord>,
}

#[derive(Deserialize)]
struct IdOnly {
    id: i64,
}

/// Created ids come back either bare or wrapped in `data`.
#[derive(Deserialize)]
struct CreatedResponse {
    id: Option<i64>,
    data: Option<IdOnly>,
}

impl CreatedResponse {
    fn id(&self) -> Option<i64> {
        self.id.or_else(|| self.data.as_ref().map(|d| d.id))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

#[derive(Deserialize)]
struct BackendMessage {
    message: Option<String>,
}

impl BudgetApi {
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            access_token: config.backend_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ---- Plans ----

    /// The plan for `ym`, or `None` when no plan was set for that month.
    pub async fn get_plan(&self, ym: YearMonth) -> AppResult<Option<MonthlyPlan>> {
        debug!(year_month = %ym, "Fetching plan");

        let response = self
            .post("/api/budget/plans/get")
            .json(&YmBody { ym })
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(year_month = %ym, "No plan for month");
            return Ok(None);
        }

        let body = check(response).await?.text().await?;
        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(None);
        }

        let plan: PlanResponse = parse_json(trimmed)?;
        Ok(Some(MonthlyPlan {
            ym: plan.ym.unwrap_or(ym),
            amount: plan.amount.unwrap_or(0),
        }))
    }

    pub async fn create_plan(&self, ym: YearMonth, amount: i64) -> AppResult<MonthlyPlan> {
        let request = self.post("/api/budget/plans/create");
        self.send_plan(request, ym, amount).await
    }

    pub async fn update_plan(&self, ym: YearMonth, amount: i64) -> AppResult<MonthlyPlan> {
        let request = self.patch("/api/budget/plans/update");
        self.send_plan(request, ym, amount).await
    }

    /// Create the plan, falling back to an update when the month already has one.
    pub async fn save_plan(&self, ym: YearMonth, amount: i64) -> AppResult<MonthlyPlan> {
        match self.create_plan(ym, amount).await {
            Ok(plan) => Ok(plan),
            Err(AppError::Upstream { status, message }) => {
                warn!(year_month = %ym, status, %message, "Plan create rejected, updating instead");
                self.update_plan(ym, amount).await
            }
            Err(e) => Err(e),
        }
    }

    async fn send_plan(
        &self,
        request: RequestBuilder,
        ym: YearMonth,
        amount: i64,
    ) -> AppResult<MonthlyPlan> {
        let response = request.json(&PlanBody { ym, amount }).send().await?;
        let body = check(response).await?.text().await?;
        info!(year_month = %ym, amount, "Saved plan");

        // Some backends answer with an empty body on success
        let plan = match body.trim() {
            "" | "null" => None,
            trimmed => Some(parse_json::<PlanResponse>(trimmed)?),
        };
        Ok(MonthlyPlan {
            ym,
            amount: plan.and_then(|p| p.amount).unwrap_or(amount),
        })
    }

    // ---- Categories ----

    pub async fn list_categories(&self, include_inactive: bool) -> AppResult<Vec<Category>> {
        let response = self
            .post("/api/budget/categories/list")
            .json(&CategoryListBody { include_inactive })
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn create_category(&self, category: &NewCategory) -> AppResult<i64> {
        let response = self
            .post("/api/budget/categories/create")
            .json(category)
            .send()
            .await?;
        let created: CreatedResponse = read_json(response).await?;
        let id = created
            .id()
            .ok_or_else(|| AppError::Internal("Backend did not return a category id".into()))?;
        info!(category_id = id, name = %category.name, "Created category");
        Ok(id)
    }

    // ---- Spends ----

    /// Log a new expenditure and return the id the backend assigned to it.
    pub async fn add_spend(&self, spend: &NewExpenditure) -> AppResult<i64> {
        let response = self
            .post("/api/budget/spends/add")
            .json(spend)
            .send()
            .await?;
        let created: CreatedResponse = read_json(response).await?;
        let id = created
            .id()
            .ok_or_else(|| AppError::Internal("Backend did not return a spend id".into()))?;
        info!(spend_id = id, date = %spend.date, amount = spend.amount, "Added spend");
        Ok(id)
    }

    pub async fn delete_spend(&self, id: i64) -> AppResult<()> {
        let response = self
            .post("/api/budget/spends/delete")
            .json(&IdBody { id })
            .send()
            .await?;
        check(response).await?;
        info!(spend_id = id, "Deleted spend");
        Ok(())
    }

    pub async fn update_spend(&self, update: &ExpenditureUpdate) -> AppResult<()> {
        let response = self
            .patch("/api/budget/spends/update")
            .json(update)
            .send()
            .await?;
        check(response).await?;
        info!(spend_id = update.id, "Updated spend");
        Ok(())
    }

    /// Every expenditure the backend holds for `ym`.
    pub async fn load_month(&self, ym: YearMonth) -> AppResult<Vec<ExpenditureRecord>> {
        let response = self
            .post("/api/budget/spends/loadByMonth")
            .json(&YmBody { ym })
            .send()
            .await?;
        let month: MonthSpendsResponse = read_json(response).await?;
        debug!(
            year_month = %ym,
            count = month.spend_detail_res_list.len(),
            "Loaded month spends"
        );
        Ok(month.spend_detail_res_list)
    }

    pub async fn get_spend(&self, id: i64) -> AppResult<ExpenditureRecord> {
        let response = self
            .post("/api/budget/spends/getDetail")
            .json(&IdBody { id })
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("Spend {} not found", id)));
        }
        read_json(response).await
    }

    // ---- OAuth ----

    /// Exchange the provider's authorization code for backend tokens.
    pub async fn exchange_naver_code(&self, code: &str, state: &str) -> AppResult<TokenPair> {
        let response = self
            .client
            .get(self.url("/member/naverlogin"))
            .query(&[("code", code), ("state", state)])
            .send()
            .await?;
        let tokens: TokenResponse = read_json(response).await?;

        match (tokens.access_token, tokens.refresh_token) {
            (Some(access_token), Some(refresh_token)) => Ok(TokenPair {
                access_token,
                refresh_token,
            }),
            _ => Err(AppError::Upstream {
                status: StatusCode::BAD_GATEWAY.as_u16(),
                message: "Backend did not issue tokens".into(),
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.authorized(self.client.post(self.url(path)))
    }

    fn patch(&self, path: &str) -> RequestBuilder {
        self.authorized(self.client.patch(self.url(path)))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Turn a non-success response into [`AppError::Upstream`], preferring the
/// backend's `message` field over the raw body.
async fn check(response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<BackendMessage>(&body)
        .ok()
        .and_then(|m| m.message)
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.to_string()
            } else {
                body
            }
        });

    Err(AppError::Upstream {
        status: status.as_u16(),
        message,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> AppResult<T> {
    let body = check(response).await?.text().await?;
    parse_json(&body)
}

fn parse_json<T: DeserializeOwned>(body: &str) -> AppResult<T> {
    serde_json::from_str(body)
        .map_err(|e| AppError::Internal(format!("Failed to parse backend response: {}", e)))
}
