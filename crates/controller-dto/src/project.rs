use gns3_domain::{Project, ProjectStatus};
use gns3_protocol::ProjectResponseDto;

pub fn project_to_dto(project: &Project) -> ProjectResponseDto {
    ProjectResponseDto {
        project_id: project.id.to_string(),
        name: project.name.clone(),
        status: match project.status {
            ProjectStatus::Opened => "opened".to_string(),
            ProjectStatus::Closed => "closed".to_string(),
        },
        path: project.path.clone(),
        auto_start: project.auto_start,
        auto_open: project.auto_open,
        auto_close: project.auto_close,
    }
}
