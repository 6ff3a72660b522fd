use crate::router::NavigationError;
use crate::router::location::normalize_path;

/// Record redirects followed while resolving one path.
const MAX_RECORD_REDIRECTS: usize = 8;

/// Path of the fallback record that catches every unmatched path.
pub const CATCH_ALL: &str = "*";

/// Opaque handle to the view a record renders. Loading the view is the
/// presentation layer's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewHandle(pub &'static str);

/// Route metadata. Children inherit their ancestors' values unless they set
/// their own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub title: Option<String>,
    pub icon: Option<String>,
    /// `None`: any signed-in user. `Some`: only these roles.
    pub roles: Option<Vec<String>>,
    pub hidden: Option<bool>,
}

impl RouteMeta {
    pub fn titled(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            ..Self::default()
        }
    }

    pub fn icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    pub fn roles(mut self, roles: &[&str]) -> Self {
        self.roles = Some(roles.iter().map(|r| r.to_string()).collect());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = Some(true);
        self
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden.unwrap_or(false)
    }

    /// `self` overlaid by `child`.
    fn merged_with(&self, child: &RouteMeta) -> RouteMeta {
        RouteMeta {
            title: child.title.clone().or_else(|| self.title.clone()),
            icon: child.icon.clone().or_else(|| self.icon.clone()),
            roles: child.roles.clone().or_else(|| self.roles.clone()),
            hidden: child.hidden.or(self.hidden),
        }
    }
}

/// One node of the declarative route tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRecord {
    /// Absolute (`/samples`), relative to the parent (`clients`), empty for
    /// the parent's own path, or [`CATCH_ALL`].
    pub path: String,
    pub name: Option<String>,
    pub redirect: Option<String>,
    pub meta: RouteMeta,
    pub view: Option<ViewHandle>,
    pub children: Vec<RouteRecord>,
}

impl RouteRecord {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            name: None,
            redirect: None,
            meta: RouteMeta::default(),
            view: None,
            children: Vec::new(),
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn redirect(mut self, to: &str) -> Self {
        self.redirect = Some(to.to_string());
        self
    }

    pub fn meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn view(mut self, view: &'static str) -> Self {
        self.view = Some(ViewHandle(view));
        self
    }

    pub fn children(mut self, children: Vec<RouteRecord>) -> Self {
        self.children = children;
        self
    }
}

/// What a path resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    /// Normalized path after following record redirects.
    pub path: String,
    pub name: Option<String>,
    pub meta: RouteMeta,
    pub view: Option<ViewHandle>,
    /// Matched only by the catch-all record.
    pub fallback: bool,
}

#[derive(Debug, Clone)]
struct FlatRoute {
    full_path: String,
    name: Option<String>,
    redirect: Option<String>,
    meta: RouteMeta,
    view: Option<ViewHandle>,
}

/// The route tree flattened into full paths, ready for lookups.
#[derive(Debug, Clone)]
pub struct RouteTable {
    records: Vec<RouteRecord>,
    flat: Vec<FlatRoute>,
    fallback: Option<FlatRoute>,
}

impl RouteTable {
    pub fn new(records: Vec<RouteRecord>) -> Self {
        let mut flat = Vec::new();
        let mut fallback = None;
        for record in &records {
            flatten(record, "", &RouteMeta::default(), &mut flat, &mut fallback);
        }

        Self {
            records,
            flat,
            fallback,
        }
    }

    pub fn records(&self) -> &[RouteRecord] {
        &self.records
    }

    /// Every resolvable full path, in match order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.flat.iter().map(|r| r.full_path.as_str())
    }

    /// Match `path`, following record redirects.
    pub fn resolve(&self, path: &str) -> Result<ResolvedRoute, NavigationError> {
        let mut current = normalize_path(path);

        for _ in 0..=MAX_RECORD_REDIRECTS {
            let matched = self.flat.iter().find(|r| r.full_path == current);

            let route = match (matched, &self.fallback) {
                (Some(route), _) => route,
                (None, Some(fallback)) => {
                    return Ok(ResolvedRoute {
                        path: current,
                        name: fallback.name.clone(),
                        meta: fallback.meta.clone(),
                        view: fallback.view,
                        fallback: true,
                    });
                }
                (None, None) => return Err(NavigationError::NoMatch(current)),
            };

            match &route.redirect {
                Some(to) => current = normalize_path(to),
                None => {
                    return Ok(ResolvedRoute {
                        path: current,
                        name: route.name.clone(),
                        meta: route.meta.clone(),
                        view: route.view,
                        fallback: false,
                    });
                }
            }
        }

        Err(NavigationError::RedirectLimit(normalize_path(path)))
    }
}

fn flatten(
    record: &RouteRecord,
    parent_path: &str,
    parent_meta: &RouteMeta,
    out: &mut Vec<FlatRoute>,
    fallback: &mut Option<FlatRoute>,
) {
    let meta = parent_meta.merged_with(&record.meta);

    if record.path == CATCH_ALL {
        *fallback = Some(FlatRoute {
            full_path: CATCH_ALL.to_string(),
            name: record.name.clone(),
            redirect: None,
            meta,
            view: record.view,
        });
        return;
    }

    let full_path = if record.path.starts_with('/') {
        normalize_path(&record.path)
    } else {
        normalize_path(&format!("{}/{}", parent_path, record.path))
    };

    // Children first: an empty-path child shadows its parent.
    for child in &record.children {
        flatten(child, &full_path, &meta, out, fallback);
    }

    out.push(FlatRoute {
        full_path,
        name: record.name.clone(),
        redirect: record.redirect.clone(),
        meta,
        view: record.view,
    });
}

/// Route table of the laboratory application.
pub fn lab_routes(login_path: &str, home_path: &str) -> Vec<RouteRecord> {
    fn section(path: &str, redirect: &str, meta: RouteMeta, children: Vec<RouteRecord>) -> RouteRecord {
        RouteRecord::new(path)
            .view("layout")
            .redirect(redirect)
            .meta(meta)
            .children(children)
    }

    fn page(path: &str, name: &str, title: &str, view: &'static str) -> RouteRecord {
        RouteRecord::new(path)
            .named(name)
            .view(view)
            .meta(RouteMeta::titled(title))
    }

    vec![
        RouteRecord::new(login_path)
            .named("Login")
            .view("login")
            .meta(RouteMeta::titled("Login")),
        RouteRecord::new("/")
            .view("layout")
            .redirect(home_path)
            .children(vec![
                RouteRecord::new(home_path)
                    .named("Dashboard")
                    .view("dashboard")
                    .meta(RouteMeta::titled("Dashboard").icon("Odometer")),
            ]),
        section(
            "/samples",
            "/samples/commissions",
            RouteMeta::titled("Sample Intake").icon("Document"),
            vec![
                page("commissions", "Commissions", "Commissions", "samples/commissions"),
                page("clients", "Clients", "Clients", "samples/clients"),
                page("receives", "Receives", "Sample Receipts", "samples/receives"),
            ],
        ),
        section(
            "/workflow",
            "/workflow/list",
            RouteMeta::titled("Sample Workflow").icon("Operation"),
            vec![
                page("list", "WorkflowList", "Workflow", "workflow/list"),
                page("tasks", "Tasks", "My Tasks", "workflow/tasks"),
            ],
        ),
        section(
            "/records",
            "/records/list",
            RouteMeta::titled("Raw Records").icon("Tickets"),
            vec![
                page("list", "RecordList", "Records", "records/list"),
                page("templates", "RecordTemplates", "Templates", "records/templates"),
            ],
        ),
        section(
            "/ocr",
            "/ocr/scans",
            RouteMeta::titled("OCR").icon("Camera"),
            vec![
                page("scans", "Scans", "Scans", "ocr/scans"),
                page("reports", "Reports", "Test Reports", "ocr/reports"),
            ],
        ),
        section(
            "/quality",
            "/quality/documents",
            RouteMeta::titled("Quality System").icon("Files"),
            vec![page("documents", "QualityDocuments", "Documents", "quality/documents")],
        ),
        section(
            "/capability",
            "/capability/standards",
            RouteMeta::titled("Capability").icon("Medal"),
            vec![
                page("standards", "Standards", "Test Standards", "capability/standards"),
                page("parameters", "Parameters", "Test Parameters", "capability/parameters"),
            ],
        ),
        section(
            "/equipment",
            "/equipment/list",
            RouteMeta::titled("Equipment").icon("Monitor"),
            vec![
                page("list", "EquipmentList", "Equipment", "equipment/list"),
                page("laboratories", "Laboratories", "Laboratories", "equipment/laboratories"),
                page("calibrations", "Calibrations", "Calibrations", "equipment/calibrations"),
            ],
        ),
        section(
            "/floorplan",
            "/floorplan/view",
            RouteMeta::titled("Floor Plan").icon("MapLocation"),
            vec![page("view", "FloorPlanView", "Floor Plan", "floorplan/view")],
        ),
        section(
            "/statistics",
            "/statistics/dashboard",
            RouteMeta::titled("Statistics").icon("DataAnalysis"),
            vec![
                page("dashboard", "StatisticsDashboard", "Overview", "statistics/dashboard"),
                page("reports", "StatisticsReports", "Reports", "statistics/reports"),
            ],
        ),
        section(
            "/ai-verify",
            "/ai-verify/verify",
            RouteMeta::titled("AI Verification").icon("MagicStick"),
            vec![
                page("verify", "AiVerify", "Verify Document", "ai-verify/verify"),
                page("records", "VerifyRecords", "Verification Records", "ai-verify/records"),
            ],
        ),
        section(
            "/cloud",
            "/cloud/applications",
            RouteMeta::titled("Cloud Query").icon("Cloudy"),
            vec![page("applications", "CloudApplications", "Applications", "cloud/applications")],
        ),
        section(
            "/users",
            "/users/list",
            RouteMeta::titled("Users").icon("User").roles(&["admin"]),
            vec![
                page("list", "UserList", "Users", "users/list"),
                page("departments", "Departments", "Departments", "users/departments"),
            ],
        ),
        RouteRecord::new("/profile").view("layout").children(vec![
            RouteRecord::new("")
                .named("Profile")
                .view("profile")
                .meta(RouteMeta::titled("Profile").hidden()),
        ]),
        RouteRecord::new(CATCH_ALL)
            .named("NotFound")
            .view("error/404")
            .meta(RouteMeta::default().hidden()),
    ]
}
