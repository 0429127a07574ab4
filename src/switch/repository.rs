use crate::domain::Device;
use crate::switch::client::{self, AuthError, Session, TransportError};
use crate::switch::page_text::{self, ParseError};
use thiserror::Error;
use tracing::{info, instrument};

const SYSTEM_INFO_PAGE: &str = "SystemInfoRpm.htm";
const PORT_STATISTICS_PAGE: &str = "PortStatisticsRpm.htm";

/// Single writer for one switch's device record. Holds the credentials and
/// the record being populated; one instance per device, no sharing.
pub struct DeviceRepository {
    device: Device,
    base_url: String,
    username: String,
    password: String,
}

impl DeviceRepository {
    /// `base_url` is expected to end with `/`; a malformed URL surfaces as a
    /// transport failure on the first request.
    pub fn new(base_url: String, username: String, password: String) -> Self {
        DeviceRepository {
            device: Device::default(),
            base_url,
            username,
            password,
        }
    }

    #[instrument(skip_all)]
    pub async fn logon(&self) -> Result<Session, AuthError> {
        info!("Logging on to {}...", self.base_url);
        let session = client::login(&self.base_url, &self.username, &self.password).await?;
        info!("Logging on to {}... OK", self.base_url);
        Ok(session)
    }

    #[instrument(skip_all)]
    pub async fn load_system_info(&mut self, session: &Session) -> Result<(), CollectError> {
        info!("Retrieving system info...");
        let text = session.fetch(&self.base_url, SYSTEM_INFO_PAGE).await?;
        let fields = page_text::extract_system_info(&text)?;

        // Read all seven fields before assigning any, so a missing key cannot
        // leave the record half-updated.
        let description = fields.get("descriStr")?.to_owned();
        let mac_address = fields.get("macStr")?.to_owned();
        let ip_address = fields.get("ipStr")?.to_owned();
        let subnet_mask = fields.get("netmaskStr")?.to_owned();
        let gateway = fields.get("gatewayStr")?.to_owned();
        let firmware = fields.get("firmwareStr")?.to_owned();
        let hardware = fields.get("hardwareStr")?.to_owned();

        self.device.description = description;
        self.device.mac_address = mac_address;
        self.device.ip_address = ip_address;
        self.device.subnet_mask = subnet_mask;
        self.device.gateway = gateway;
        self.device.firmware = firmware;
        self.device.hardware = hardware;

        info!("Retrieving system info... OK, device '{}'", self.device.description);
        Ok(())
    }

    #[instrument(skip_all)]
    pub async fn load_ports_info(&mut self, session: &Session) -> Result<(), CollectError> {
        info!("Retrieving port statistics...");
        let text = session.fetch(&self.base_url, PORT_STATISTICS_PAGE).await?;
        let ports = page_text::extract_ports_info(&text)?;
        info!("Retrieving port statistics... OK, {} ports", ports.len());

        // Replaced as a whole; a parse failure above leaves the previous list.
        self.device.ports = ports;
        Ok(())
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn into_device(self) -> Device {
        self.device
    }
}

#[derive(Error, Debug)]
pub enum CollectError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LinkMode, Port, PortState};
    use pretty_assertions::assert_eq;
    use std::error::Error;
    use test_log::test;

    async fn server_with_device_pages() -> (mockito::ServerGuard, [mockito::Mock; 3]) {
        let mut server = mockito::Server::new_async().await;
        let logon = server
            .mock("POST", "/logon.cgi")
            .with_status(200)
            .with_header("set-cookie", "H_SID=3a7f9c; Path=/")
            .create_async()
            .await;
        let system_info = server
            .mock("GET", "/SystemInfoRpm.htm")
            .with_status(200)
            .with_body(include_str!("../../tests/resources/system_info_rpm.htm"))
            .create_async()
            .await;
        let port_statistics = server
            .mock("GET", "/PortStatisticsRpm.htm")
            .with_status(200)
            .with_body(include_str!("../../tests/resources/port_statistics_rpm.htm"))
            .create_async()
            .await;
        (server, [logon, system_info, port_statistics])
    }

    fn repository_for(server: &mockito::ServerGuard) -> DeviceRepository {
        DeviceRepository::new(format!("{}/", server.url()), "admin".to_string(), "secret".to_string())
    }

    fn port(port_num: u16, link_status: LinkMode, pkts: [u64; 4]) -> Port {
        Port {
            port_num,
            state: PortState::Enabled,
            link_status,
            txgoodpkt: pkts[0],
            txbadpkt: pkts[1],
            rxgoodpkt: pkts[2],
            rxbadpkt: pkts[3],
        }
    }

    #[test(tokio::test)]
    async fn collects_the_full_device_record() -> Result<(), Box<dyn Error>> {
        let (server, _mocks) = server_with_device_pages().await;
        let mut repository = repository_for(&server);

        let session = repository.logon().await?;
        repository.load_system_info(&session).await?;
        repository.load_ports_info(&session).await?;

        assert_eq!(
            repository.into_device(),
            Device {
                description: "TL-SG105E".to_string(),
                mac_address: "50:C7:BF:12:34:56".to_string(),
                ip_address: "192.168.0.1".to_string(),
                subnet_mask: "255.255.255.0".to_string(),
                gateway: "192.168.0.254".to_string(),
                firmware: "1.0.0 Build 20160722 Rel.50167".to_string(),
                hardware: "TL-SG105E 3.0".to_string(),
                ports: vec![
                    port(1, LinkMode::GigabitFull, [4886, 0, 3521, 0]),
                    port(2, LinkMode::LinkDown, [0, 0, 0, 0]),
                    port(3, LinkMode::HundredFull, [1234, 2, 998, 0]),
                    port(4, LinkMode::LinkDown, [0, 0, 0, 0]),
                    port(5, LinkMode::TenFull, [77, 0, 80, 1]),
                ],
            }
        );
        Ok(())
    }

    #[test(tokio::test)]
    async fn logon_propagates_a_rejected_login() {
        let mut server = mockito::Server::new_async().await;
        let _logon = server.mock("POST", "/logon.cgi").with_status(403).create_async().await;
        let repository = repository_for(&server);

        let result = repository.logon().await;

        assert!(matches!(result, Err(AuthError::HttpStatus(code)) if code.as_u16() == 403));
    }

    #[test(tokio::test)]
    async fn a_failed_system_info_load_leaves_the_record_untouched() -> Result<(), Box<dyn Error>> {
        let (mut server, _mocks) = server_with_device_pages().await;
        let mut repository = repository_for(&server);
        let session = repository.logon().await?;
        repository.load_system_info(&session).await?;

        // An expired session renders the login page instead of the info page
        server.reset_async().await;
        let _page = server
            .mock("GET", "/SystemInfoRpm.htm")
            .with_status(200)
            .with_body("<html>login page</html>")
            .create_async()
            .await;

        let result = repository.load_system_info(&session).await;

        assert!(matches!(result, Err(CollectError::Parse(ParseError::PatternNotFound("info_ds")))));
        assert_eq!(repository.device().description, "TL-SG105E");
        assert_eq!(repository.device().firmware, "1.0.0 Build 20160722 Rel.50167");
        Ok(())
    }

    #[test(tokio::test)]
    async fn a_failed_ports_load_leaves_the_port_list_untouched() -> Result<(), Box<dyn Error>> {
        let (mut server, _mocks) = server_with_device_pages().await;
        let mut repository = repository_for(&server);
        let session = repository.logon().await?;
        repository.load_ports_info(&session).await?;

        server.reset_async().await;
        let _page = server
            .mock("GET", "/PortStatisticsRpm.htm")
            .with_status(200)
            .with_body("var max_port_num = 1;\nstate:[7],\nlink_status:[0],\npkts:[0,0,0,0]")
            .create_async()
            .await;

        let result = repository.load_ports_info(&session).await;

        assert!(matches!(result, Err(CollectError::Parse(ParseError::IndexOutOfRange(_)))));
        assert_eq!(repository.device().ports.len(), 5);
        Ok(())
    }
}
