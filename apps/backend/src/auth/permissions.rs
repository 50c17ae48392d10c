//! Route permission table.
//!
//! Every protected route names a [`Permission`]; the roles allowed to use it
//! live here and nowhere else.

use super::claims::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    ViewDashboard,
    ReadFinance,
    ManageFinance,
    ManageDonations,
    ManageContent,
    ManageUsers,
    ViewActivity,
}

const ALL_STAFF: &[Role] = &[Role::SuperAdmin, Role::Admin, Role::Viewer];
const EDITORS: &[Role] = &[Role::SuperAdmin, Role::Admin];
const SUPER_ADMIN_ONLY: &[Role] = &[Role::SuperAdmin];

impl Permission {
    pub fn allowed_roles(self) -> &'static [Role] {
        match self {
            Permission::ViewDashboard | Permission::ReadFinance => ALL_STAFF,
            Permission::ManageFinance | Permission::ManageDonations | Permission::ManageContent => {
                EDITORS
            }
            Permission::ManageUsers | Permission::ViewActivity => SUPER_ADMIN_ONLY,
        }
    }

    pub fn allows(self, role: Role) -> bool {
        self.allowed_roles().contains(&role)
    }
}

/// Type-level handle on a [`Permission`], used by the `Authorized<P>` extractor.
pub trait RoutePermission {
    const PERMISSION: Permission;
}

macro_rules! route_permissions {
    ($($name:ident),* $(,)?) => {
        $(
            #[derive(Debug)]
            pub struct $name;

            impl RoutePermission for $name {
                const PERMISSION: Permission = Permission::$name;
            }
        )*
    };
}

route_permissions!(
    ViewDashboard,
    ReadFinance,
    ManageFinance,
    ManageDonations,
    ManageContent,
    ManageUsers,
    ViewActivity,
);
