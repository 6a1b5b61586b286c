use utoipa::OpenApi;

use crate::{
    api::models::{ActivityItemResponse, ErrorResponse, SplitPreviewRequest, SplitPreviewResponse, WeightEntry},
    core::{
        models::{
            activity::ActivityKind,
            audit::AppLog,
            group::GroupCategory,
            summary::{GroupCard, GroupSummary, MemberBalance, Overview},
        },
        splits::Share,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::get_overview,
        super::handlers::get_group_summary,
        super::handlers::get_activity,
        super::handlers::preview_split,
        super::handlers::get_app_logs
    ),
    components(schemas(
        SplitPreviewRequest,
        SplitPreviewResponse,
        WeightEntry,
        Share,
        ActivityItemResponse,
        ActivityKind,
        ErrorResponse,
        Overview,
        GroupCard,
        GroupSummary,
        MemberBalance,
        GroupCategory,
        AppLog
    )),
    info(
        title = "Divide Aí API",
        description = "Read-only balances and activity for shared-expense groups",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
