//! Login, reaching the diary form and recovering from a broken page.

use diary_core::{DiaryError, DiaryResult, Element};
use tracing::{debug, info, warn};

use super::selectors::*;
use super::DiarySession;
use crate::pacing::DelayKind;

/// Whether `url` points at the diary form, ignoring query and fragment.
pub(crate) fn is_detail_page(url: &str) -> bool {
    url.split(['?', '#'])
        .next()
        .is_some_and(|path| path.ends_with(DETAIL_PAGE_SUFFIX))
}

impl DiarySession {
    /// Sign in with the configured account.
    ///
    /// Still sitting on the login form afterwards means the portal rejected
    /// the credentials, which is fatal.
    pub async fn login(&self) -> DiaryResult<()> {
        let site = &self.config.site;
        let account = &self.config.account;

        info!("로그인 페이지로 이동 중...");
        self.driver.navigate(&site.login_url).await?;
        self.pacer.pause(DelayKind::FastWait).await;

        let username = self.driver.wait_for(LOGIN_ID, self.config.browser.wait()).await?;
        self.pacer.pause(DelayKind::Input).await;
        self.driver.set_value(&username, &account.username).await?;
        self.pacer.pause(DelayKind::Input).await;

        let password = self.driver.find_element(LOGIN_PASSWORD).await?;
        self.pacer.pause(DelayKind::Input).await;
        self.driver.set_value(&password, &account.password).await?;
        self.pacer.pause(DelayKind::Input).await;

        let button = self.driver.find_element(LOGIN_BUTTON).await?;
        self.driver.click(&button).await?;
        self.pacer.pause(DelayKind::LongWait).await;

        let url = self.driver.current_url().await?;
        if url.starts_with(&site.login_url) && !self.driver.find_elements(LOGIN_PASSWORD).await?.is_empty() {
            return Err(DiaryError::Fatal(format!(
                "Login rejected for {}: still on the login form",
                account.username
            )));
        }

        info!("로그인 완료!");
        Ok(())
    }

    /// Make sure the diary form is open, going through the main page's
    /// write link when it is not.
    pub async fn ensure_detail_page(&self) -> DiaryResult<()> {
        let url = self.driver.current_url().await?;
        if is_detail_page(&url) {
            debug!("Already on the diary form");
            return Ok(());
        }

        info!("영농일지 작성 페이지로 이동 중...");
        self.driver.navigate(&self.config.site.main_url).await?;
        self.pacer.pause(DelayKind::FastWait).await;

        if let Err(e) = self.follow_write_link().await {
            warn!("Write link unavailable ({}), opening the diary form directly", e);
            self.driver.navigate(&self.config.site.detail_url).await?;
            self.pacer.pause(DelayKind::FastWait).await;
        }
        Ok(())
    }

    async fn follow_write_link(&self) -> DiaryResult<()> {
        let link = self.driver.wait_for(WRITE_LINK, self.config.browser.wait()).await?;
        self.driver.click(&link).await?;
        self.pacer.pause(DelayKind::FastWait).await;
        Ok(())
    }

    /// Return to the main page and re-enter the diary form.
    ///
    /// The write link is looked up by its exact script target, then by its
    /// text, then by a looser href match. Without a link the form URL is
    /// opened directly.
    pub async fn recover(&self) -> DiaryResult<()> {
        info!("🔄 에러 복구: 메인 페이지로 돌아가서 영농일지 등록 재시작...");
        self.driver.navigate(&self.config.site.main_url).await?;
        self.pacer.pause(DelayKind::LongWait).await;

        match self.find_write_link().await? {
            Some(link) => {
                debug!("Recovery via {}", link.selector);
                self.driver.click(&link).await?;
            }
            None => {
                warn!("영농일지 등록 링크를 찾을 수 없어 작성 페이지로 직접 이동합니다");
                self.driver.navigate(&self.config.site.detail_url).await?;
            }
        }
        self.pacer.pause(DelayKind::LongWait).await;

        self.driver.wait_for(START_DATE, self.config.browser.long_wait()).await?;
        info!("✅ 에러 복구 완료");
        Ok(())
    }

    async fn find_write_link(&self) -> DiaryResult<Option<Element>> {
        if let Some(link) = self.driver.find_elements(WRITE_LINK_EXACT).await?.into_iter().next() {
            return Ok(Some(link));
        }

        let by_text = self
            .driver
            .find_elements(ANCHORS)
            .await?
            .into_iter()
            .find(|a| a.label().contains(WRITE_LINK_TEXT));
        if by_text.is_some() {
            return Ok(by_text);
        }

        Ok(self.driver.find_elements(WRITE_LINK_ANY).await?.into_iter().next())
    }
}
