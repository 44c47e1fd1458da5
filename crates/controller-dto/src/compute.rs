use gns3_domain::Compute;
use gns3_protocol::compute::ComputeCapabilitiesDto;
use gns3_protocol::ComputeResponseDto;

pub fn compute_to_dto(compute: &Compute) -> ComputeResponseDto {
    ComputeResponseDto {
        compute_id: compute.id.to_string(),
        name: compute.name.clone(),
        host: compute.host.clone(),
        port: compute.port,
        protocol: compute.protocol,
        connected: compute.connected(),
        last_error: compute.last_error.clone(),
        capabilities: ComputeCapabilitiesDto {
            node_types: compute
                .capabilities
                .supported_node_types
                .iter()
                .map(|t| format!("{t:?}").to_lowercase())
                .collect(),
            platform: compute.capabilities.platform.clone(),
            cpus: compute.capabilities.cpus,
            memory_mb: compute.capabilities.memory_mb,
        },
    }
}
