// marley-service/src/utils/project_storage.rs
use crate::models::{Project, ServiceError};
use crate::utils::fs_utils;

const PROJECTS_TABLE: &str = "projects";

pub fn save_project(project: &Project) -> Result<(), ServiceError> {
    fs_utils::write_row(PROJECTS_TABLE, &project.id, project)
}

pub fn find_project_by_id(project_id: &str) -> Result<Option<Project>, ServiceError> {
    fs_utils::read_row(PROJECTS_TABLE, project_id)
}

pub fn delete_project(project_id: &str) -> Result<bool, ServiceError> {
    fs_utils::delete_row(PROJECTS_TABLE, project_id)
}

// Most recently updated first
pub fn get_projects_for_team(team_id: &str) -> Result<Vec<Project>, ServiceError> {
    let mut projects: Vec<Project> = fs_utils::scan_rows(PROJECTS_TABLE)?
        .into_iter()
        .filter(|project: &Project| project.team_id == team_id)
        .collect();
    projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    Ok(projects)
}
