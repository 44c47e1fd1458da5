use gns3_domain::{Link, LinkEndpoint};
use gns3_domain_types::NodeId;
use gns3_protocol::{LinkCreateRequestDto, LinkEndpointDto, LinkFiltersDto, LinkResponseDto};

pub fn link_to_dto(link: &Link) -> LinkResponseDto {
    LinkResponseDto {
        link_id: link.id.to_string(),
        link_type: link.link_type,
        nodes: link
            .endpoints
            .iter()
            .map(|e| LinkEndpointDto {
                node_id: e.node_id.to_string(),
                adapter_number: e.adapter_number,
                port_number: e.port_number,
                label: e.label.clone(),
            })
            .collect(),
        filters: LinkFiltersDto {
            latency_ms: link.filters.latency_ms,
            jitter_ms: link.filters.jitter_ms,
            loss_pct: link.filters.loss_pct,
            corrupt_pct: link.filters.corrupt_pct,
            bpf: link.filters.bpf.clone(),
            frequency_drop: link.filters.frequency_drop,
        },
        capturing: link.capture.capturing,
        capture_file_name: link.capture.capture_file_name.clone(),
        capture_node_id: link.capture.capture_node_id.map(|id| id.to_string()),
    }
}

/// Parses the two required endpoints out of a create request. Returns
/// `None` if the count is not exactly two, or if a node id fails to
/// parse — the caller turns that into a `LinkError::Validation`.
pub fn link_create_from_dto(dto: &LinkCreateRequestDto) -> Option<(LinkEndpoint, LinkEndpoint)> {
    if dto.nodes.len() != 2 {
        return None;
    }
    let a = endpoint_from_dto(&dto.nodes[0])?;
    let b = endpoint_from_dto(&dto.nodes[1])?;
    Some((a, b))
}

fn endpoint_from_dto(dto: &gns3_protocol::LinkEndpointDto) -> Option<LinkEndpoint> {
    Some(LinkEndpoint {
        node_id: dto.node_id.parse::<NodeId>().ok()?,
        adapter_number: dto.adapter_number,
        port_number: dto.port_number,
        label: dto.label.clone(),
    })
}
