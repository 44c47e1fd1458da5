use gns3_domain::Node;
use gns3_protocol::{NodePortDto, NodeResponseDto};

pub fn node_to_dto(node: &Node) -> NodeResponseDto {
    NodeResponseDto {
        node_id: node.id.to_string(),
        project_id: node.project_id.to_string(),
        compute_id: node.compute_id.to_string(),
        node_type: node.node_type,
        name: node.name.clone(),
        status: node.status,
        x: node.x,
        y: node.y,
        z: node.z,
        console_type: node.console_type,
        console_host: node.console_host.clone(),
        console_port: node.console_port,
        properties: node.properties.clone(),
        ports: node
            .ports
            .iter()
            .map(|p| NodePortDto {
                adapter_number: p.adapter_number,
                port_number: p.port_number,
                name: p.name.clone(),
                link_type: p.link_type,
            })
            .collect(),
    }
}
