//! # Employee Repository
//!
//! Staff account management: login, creation, activation lifecycle, and
//! password reset. Deactivation is soft; a hard delete is only allowed once
//! the account is already inactive.

use crate::error::RepositoryError;
use crate::models::employee::{
    ActiveModel as EmployeeActiveModel, Column, Entity as Employee, Model as EmployeeModel,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QueryOrder, Set,
};
use subtle::ConstantTimeEq;

/// Outcome of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials matched an active account.
    Success(EmployeeModel),
    /// Credentials matched but the account is deactivated.
    Inactive,
    /// No account matched.
    Failure,
}

/// Request data for creating a new employee
#[derive(Debug, Clone)]
pub struct CreateEmployeeRequest {
    pub name: String,
    pub team: String,
    pub role: String,
}

/// Fields an existing employee account may be updated with.
#[derive(Debug, Clone, Default)]
pub struct UpdateEmployeeRequest {
    pub name: Option<String>,
    pub team: Option<String>,
    pub role: Option<String>,
}

/// Repository for employee database operations
pub struct EmployeeRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> EmployeeRepository<'a> {
    /// Create a new EmployeeRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Attempt staff login with an exact name/password match.
    ///
    /// Password comparison is constant-time. A matching but deactivated
    /// account is reported distinctly so the login endpoint can explain why.
    pub async fn authenticate(
        &self,
        name: &str,
        password: &str,
    ) -> Result<LoginOutcome, RepositoryError> {
        let Some(account) = self.find_by_name(name).await? else {
            return Ok(LoginOutcome::Failure);
        };

        let matches: bool =
            ConstantTimeEq::ct_eq(password.as_bytes(), account.password.as_bytes()).into();
        if !matches {
            return Ok(LoginOutcome::Failure);
        }

        if !account.is_active() {
            return Ok(LoginOutcome::Inactive);
        }

        let mut active = account.clone().into_active_model();
        active.last_login = Set(Some(Utc::now().into()));
        let account = active
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(LoginOutcome::Success(account))
    }

    /// Create a new employee with the given starting password.
    pub async fn create_employee(
        &self,
        request: CreateEmployeeRequest,
        initial_password: &str,
    ) -> Result<EmployeeModel, RepositoryError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(RepositoryError::validation_error(
                "Employee name cannot be empty",
            ));
        }

        if !matches!(request.role.as_str(), "admin" | "team_leader" | "employee") {
            return Err(RepositoryError::validation_error(format!(
                "Unknown role '{}'",
                request.role
            )));
        }

        if self.find_by_name(name).await?.is_some() {
            return Err(RepositoryError::conflict(format!(
                "Employee '{}' already exists",
                name
            )));
        }

        let employee = EmployeeActiveModel {
            name: Set(name.to_string()),
            team: Set(request.team),
            role: Set(request.role),
            status: Set("active".to_string()),
            password: Set(initial_password.to_string()),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let result = employee
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(result)
    }

    /// Get employee by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<EmployeeModel>, RepositoryError> {
        let employee = Employee::find_by_id(id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(employee)
    }

    /// Get employee by login name
    pub async fn find_by_name(&self, name: &str) -> Result<Option<EmployeeModel>, RepositoryError> {
        let employee = Employee::find()
            .filter(Column::Name.eq(name))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(employee)
    }

    /// List employees, optionally restricted to one team.
    pub async fn list_employees(
        &self,
        team: Option<&str>,
    ) -> Result<Vec<EmployeeModel>, RepositoryError> {
        let mut query = Employee::find().order_by_asc(Column::Name);
        if let Some(team) = team {
            query = query.filter(Column::Team.eq(team));
        }

        let employees = query
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(employees)
    }

    /// Soft-deactivate an account.
    pub async fn deactivate(&self, id: i32) -> Result<EmployeeModel, RepositoryError> {
        self.set_status(id, "inactive").await
    }

    /// Reactivate a previously deactivated account.
    pub async fn activate(&self, id: i32) -> Result<EmployeeModel, RepositoryError> {
        self.set_status(id, "active").await
    }

    async fn set_status(&self, id: i32, status: &str) -> Result<EmployeeModel, RepositoryError> {
        let employee = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Employee"))?;

        let mut active = employee.into_active_model();
        active.status = Set(status.to_string());

        let result = active
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(result)
    }

    /// Reset the employee's password to the configured starting password.
    pub async fn reset_password(
        &self,
        id: i32,
        default_password: &str,
    ) -> Result<EmployeeModel, RepositoryError> {
        let employee = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Employee"))?;

        let mut active = employee.into_active_model();
        active.password = Set(default_password.to_string());

        let result = active
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(result)
    }

    /// Update allow-listed account fields (name, team, role).
    pub async fn update_employee(
        &self,
        id: i32,
        request: UpdateEmployeeRequest,
    ) -> Result<EmployeeModel, RepositoryError> {
        let employee = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Employee"))?;

        if let Some(ref name) = request.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(RepositoryError::validation_error(
                    "Employee name cannot be empty",
                ));
            }
            if name != employee.name && self.find_by_name(name).await?.is_some() {
                return Err(RepositoryError::conflict(format!(
                    "Employee '{}' already exists",
                    name
                )));
            }
        }

        if let Some(ref role) = request.role
            && !matches!(role.as_str(), "admin" | "team_leader" | "employee")
        {
            return Err(RepositoryError::validation_error(format!(
                "Unknown role '{}'",
                role
            )));
        }

        let mut active = employee.into_active_model();
        if let Some(name) = request.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(team) = request.team {
            active.team = Set(team);
        }
        if let Some(role) = request.role {
            active.role = Set(role);
        }

        let result = active
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(result)
    }

    /// Permanently remove an account. Only inactive accounts can be removed.
    pub async fn permanent_delete(&self, id: i32) -> Result<(), RepositoryError> {
        let employee = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Employee"))?;

        if employee.is_active() {
            return Err(RepositoryError::validation_error(
                "Only deactivated employees can be permanently deleted",
            ));
        }

        employee
            .delete(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(())
    }
}
