//! Catalogue of the admin views.
//!
//! Every screen in the console is the same table component driven by one
//! of these [`ViewSpec`]s: where the rows come from, how a row is
//! identified, which columns to show, what the create/edit form asks for
//! and which actions apply.

use crate::api::resources;
use crate::constants::ERROR_EMPTY_FORM;
use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Users,
    Roles,
    Permissions,
    RolePermissions,
    Tenants,
    StaffSalaries,
    Students,
    StudentFees,
    StudentFacilities,
    Attendance,
    ProbableStaff,
    ProbableParents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
    Create,
    Edit,
    Delete,
    Activate,
    Assign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    Table,
    Calendar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Bool,
    Secret,
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub title: &'static str,
    pub field: &'static str,
    pub width: u16,
}

#[derive(Debug, Clone, Copy)]
pub struct FormField {
    pub label: &'static str,
    pub key: &'static str,
    pub kind: FieldKind,
}

#[derive(Debug)]
pub struct ViewSpec {
    pub kind: ViewKind,
    pub title: &'static str,
    /// Collection path, possibly containing `{parent}`
    pub path: &'static str,
    pub id_field: &'static str,
    pub parent: Option<ViewKind>,
    pub columns: &'static [Column],
    pub form: &'static [FormField],
    pub actions: &'static [ViewAction],
    pub presentation: Presentation,
    /// Body key for bulk assignment
    pub assign_field: Option<&'static str>,
}

const fn col(title: &'static str, field: &'static str, width: u16) -> Column {
    Column { title, field, width }
}

const fn text(label: &'static str, key: &'static str) -> FormField {
    FormField {
        label,
        key,
        kind: FieldKind::Text,
    }
}

const fn number(label: &'static str, key: &'static str) -> FormField {
    FormField {
        label,
        key,
        kind: FieldKind::Number,
    }
}

const CRUD: &[ViewAction] = &[ViewAction::Create, ViewAction::Edit, ViewAction::Delete];
const CREATE_DELETE: &[ViewAction] = &[ViewAction::Create, ViewAction::Delete];

static USERS: ViewSpec = ViewSpec {
    kind: ViewKind::Users,
    title: "Users",
    path: resources::USERS,
    id_field: "id",
    parent: None,
    columns: &[
        col("ID", "id", 6),
        col("Username", "username", 16),
        col("Full name", "full_name", 22),
        col("Email", "email", 26),
        col("Role", "role.name", 14),
        col("Active", "is_active", 7),
    ],
    form: &[
        text("Username", "username"),
        text("Full name", "full_name"),
        text("Email", "email"),
        FormField {
            label: "Password",
            key: "password",
            kind: FieldKind::Secret,
        },
        number("Role ID", "role_id"),
        number("Tenant ID", "tenant_id"),
        FormField {
            label: "Active",
            key: "is_active",
            kind: FieldKind::Bool,
        },
    ],
    actions: CRUD,
    presentation: Presentation::Table,
    assign_field: None,
};

static ROLES: ViewSpec = ViewSpec {
    kind: ViewKind::Roles,
    title: "Roles",
    path: resources::ROLES,
    id_field: "id",
    parent: None,
    columns: &[col("ID", "id", 6), col("Name", "name", 20), col("Description", "description", 40)],
    form: &[text("Name", "name"), text("Description", "description")],
    actions: CRUD,
    presentation: Presentation::Table,
    assign_field: None,
};

static PERMISSIONS: ViewSpec = ViewSpec {
    kind: ViewKind::Permissions,
    title: "Permissions",
    path: resources::PERMISSIONS,
    id_field: "id",
    parent: None,
    columns: &[col("ID", "id", 6), col("Name", "name", 24), col("Description", "description", 40)],
    form: &[text("Name", "name"), text("Description", "description")],
    actions: CREATE_DELETE,
    presentation: Presentation::Table,
    assign_field: None,
};

static ROLE_PERMISSIONS: ViewSpec = ViewSpec {
    kind: ViewKind::RolePermissions,
    title: "Role permissions",
    path: resources::ROLE_PERMISSIONS,
    id_field: "id",
    parent: Some(ViewKind::Roles),
    columns: &[col("ID", "id", 6), col("Name", "name", 24), col("Description", "description", 40)],
    form: &[text("Permission IDs (comma separated)", "permission_ids")],
    actions: &[ViewAction::Assign],
    presentation: Presentation::Table,
    assign_field: Some("permission_ids"),
};

static TENANTS: ViewSpec = ViewSpec {
    kind: ViewKind::Tenants,
    title: "Tenants",
    path: resources::TENANTS,
    id_field: "id",
    parent: None,
    columns: &[
        col("ID", "id", 6),
        col("Name", "name", 24),
        col("Code", "code", 10),
        col("Email", "email", 24),
        col("Phone", "phone", 14),
        col("Active", "is_active", 7),
    ],
    form: &[
        text("Name", "name"),
        text("Code", "code"),
        text("Email", "email"),
        text("Phone", "phone"),
        text("Address", "address"),
    ],
    actions: CRUD,
    presentation: Presentation::Table,
    assign_field: None,
};

static STAFF_SALARIES: ViewSpec = ViewSpec {
    kind: ViewKind::StaffSalaries,
    title: "Staff salaries",
    path: resources::STAFF_SALARIES,
    id_field: "id",
    parent: None,
    columns: &[
        col("ID", "id", 6),
        col("Staff", "staff_name", 22),
        col("Month", "month", 9),
        col("Basic", "basic_salary", 10),
        col("Allowances", "allowances", 11),
        col("Deductions", "deductions", 11),
        col("Net", "net_salary", 10),
    ],
    form: &[
        number("Staff ID", "staff_id"),
        text("Month (YYYY-MM)", "month"),
        number("Basic salary", "basic_salary"),
        number("Allowances", "allowances"),
        number("Deductions", "deductions"),
    ],
    actions: CRUD,
    presentation: Presentation::Table,
    assign_field: None,
};

static STUDENTS: ViewSpec = ViewSpec {
    kind: ViewKind::Students,
    title: "Students",
    path: resources::STUDENTS,
    id_field: "id",
    parent: None,
    columns: &[
        col("ID", "id", 6),
        col("Admission", "admission_no", 10),
        col("Name", "full_name", 22),
        col("Class", "class_name", 8),
        col("Section", "section", 8),
        col("Guardian", "guardian_name", 20),
    ],
    form: &[
        text("Admission no", "admission_no"),
        text("Full name", "full_name"),
        text("Class", "class_name"),
        text("Section", "section"),
        text("Date of birth (YYYY-MM-DD)", "date_of_birth"),
        text("Guardian name", "guardian_name"),
    ],
    actions: CRUD,
    presentation: Presentation::Table,
    assign_field: None,
};

static STUDENT_FEES: ViewSpec = ViewSpec {
    kind: ViewKind::StudentFees,
    title: "Student fees",
    path: resources::STUDENT_FEES,
    id_field: "id",
    parent: Some(ViewKind::Students),
    columns: &[
        col("ID", "id", 6),
        col("Fee", "name", 22),
        col("Amount", "amount", 10),
        col("Due", "due_date", 11),
        col("Status", "status", 10),
    ],
    form: &[text("Fee name", "name"), number("Amount", "amount"), text("Due date (YYYY-MM-DD)", "due_date")],
    actions: CREATE_DELETE,
    presentation: Presentation::Table,
    assign_field: None,
};

static STUDENT_FACILITIES: ViewSpec = ViewSpec {
    kind: ViewKind::StudentFacilities,
    title: "Student facilities",
    path: resources::STUDENT_FACILITIES,
    id_field: "id",
    parent: Some(ViewKind::Students),
    columns: &[
        col("ID", "id", 6),
        col("Facility", "facility_name", 22),
        col("Amount", "amount", 10),
        col("From", "start_date", 11),
        col("To", "end_date", 11),
    ],
    form: &[
        text("Facility", "facility_name"),
        number("Amount", "amount"),
        text("Start date (YYYY-MM-DD)", "start_date"),
        text("End date (YYYY-MM-DD)", "end_date"),
    ],
    actions: CREATE_DELETE,
    presentation: Presentation::Table,
    assign_field: None,
};

static ATTENDANCE: ViewSpec = ViewSpec {
    kind: ViewKind::Attendance,
    title: "Attendance",
    path: resources::STUDENT_ATTENDANCE,
    id_field: "id",
    parent: Some(ViewKind::Students),
    columns: &[col("Date", "date", 11), col("Status", "status", 10), col("Remarks", "remarks", 30)],
    form: &[],
    actions: &[],
    presentation: Presentation::Calendar,
    assign_field: None,
};

static PROBABLE_STAFF: ViewSpec = ViewSpec {
    kind: ViewKind::ProbableStaff,
    title: "Probable staff",
    path: resources::PROBABLE_STAFF,
    id_field: "id",
    parent: None,
    columns: &[
        col("ID", "id", 6),
        col("Name", "name", 22),
        col("Email", "email", 26),
        col("Phone", "phone", 14),
        col("Employee code", "employee_code", 14),
    ],
    form: &[],
    actions: &[ViewAction::Activate],
    presentation: Presentation::Table,
    assign_field: None,
};

static PROBABLE_PARENTS: ViewSpec = ViewSpec {
    kind: ViewKind::ProbableParents,
    title: "Probable parents",
    path: resources::PROBABLE_PARENTS,
    id_field: "id",
    parent: None,
    columns: &[
        col("ID", "id", 6),
        col("Name", "name", 22),
        col("Email", "email", 26),
        col("Phone", "phone", 14),
        col("Student", "student_name", 20),
    ],
    form: &[],
    actions: &[ViewAction::Activate],
    presentation: Presentation::Table,
    assign_field: None,
};

impl ViewKind {
    /// Sidebar order
    pub const ALL: [ViewKind; 12] = [
        ViewKind::Users,
        ViewKind::Roles,
        ViewKind::Permissions,
        ViewKind::RolePermissions,
        ViewKind::Tenants,
        ViewKind::StaffSalaries,
        ViewKind::Students,
        ViewKind::StudentFees,
        ViewKind::StudentFacilities,
        ViewKind::Attendance,
        ViewKind::ProbableStaff,
        ViewKind::ProbableParents,
    ];

    pub fn spec(self) -> &'static ViewSpec {
        match self {
            ViewKind::Users => &USERS,
            ViewKind::Roles => &ROLES,
            ViewKind::Permissions => &PERMISSIONS,
            ViewKind::RolePermissions => &ROLE_PERMISSIONS,
            ViewKind::Tenants => &TENANTS,
            ViewKind::StaffSalaries => &STAFF_SALARIES,
            ViewKind::Students => &STUDENTS,
            ViewKind::StudentFees => &STUDENT_FEES,
            ViewKind::StudentFacilities => &STUDENT_FACILITIES,
            ViewKind::Attendance => &ATTENDANCE,
            ViewKind::ProbableStaff => &PROBABLE_STAFF,
            ViewKind::ProbableParents => &PROBABLE_PARENTS,
        }
    }

    pub fn title(self) -> &'static str {
        self.spec().title
    }

    /// Config-friendly name, e.g. `staff-salaries`
    pub fn slug(self) -> String {
        self.title().to_lowercase().replace(' ', "-")
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        let wanted = slug.trim().to_lowercase().replace(['_', ' '], "-");
        Self::ALL.into_iter().find(|kind| kind.slug() == wanted)
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|kind| *kind == self).unwrap_or(0)
    }
}

impl ViewSpec {
    pub fn supports(&self, action: ViewAction) -> bool {
        self.actions.contains(&action)
    }

    /// Collection path for the given parent selection.
    pub fn collection_path(&self, parent_id: Option<&str>) -> Option<resources::ApiPath> {
        resources::scoped_path(self.path, parent_id)
    }

    /// Build a create/update body from form inputs (same order as `form`).
    ///
    /// Empty inputs are left out. Numbers and booleans are typed; anything
    /// that fails to parse is reported with the field label.
    pub fn build_payload(&self, inputs: &[String]) -> Result<Map<String, Value>, String> {
        let mut payload = Map::new();

        for (field, input) in self.form.iter().zip(inputs) {
            let input = input.trim();
            if input.is_empty() {
                continue;
            }

            let value = match field.kind {
                FieldKind::Text | FieldKind::Secret => Value::String(input.to_string()),
                FieldKind::Number => parse_number(input).ok_or_else(|| format!("{} must be a number", field.label))?,
                FieldKind::Bool => parse_bool(input)
                    .map(Value::Bool)
                    .ok_or_else(|| format!("{} must be yes or no", field.label))?,
            };
            payload.insert(field.key.to_string(), value);
        }

        if payload.is_empty() {
            return Err(ERROR_EMPTY_FORM.to_string());
        }
        Ok(payload)
    }

    /// Build the bulk-assign body from a comma-separated id list.
    pub fn build_assignment(&self, input: &str) -> Option<Map<String, Value>> {
        let field = self.assign_field?;
        let ids: Vec<Value> = input
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| parse_number(id).unwrap_or_else(|| Value::String(id.to_string())))
            .collect();

        if ids.is_empty() {
            return None;
        }

        let mut payload = Map::new();
        payload.insert(field.to_string(), Value::Array(ids));
        Some(payload)
    }
}

fn parse_number(input: &str) -> Option<Value> {
    if let Ok(n) = input.parse::<i64>() {
        return Some(Value::Number(n.into()));
    }
    input.parse::<f64>().ok().and_then(Number::from_f64).map(Value::Number)
}

fn parse_bool(input: &str) -> Option<bool> {
    match input.to_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Some(true),
        "n" | "no" | "false" | "0" => Some(false),
        _ => None,
    }
}
