//! Goal board: clustering results, dot voting, top-N ranking and approval.
//!
//! The board lives in the doelen sub-step of the flow state, so every change
//! is persisted together with the rest of the flow.

use super::{FacadeError, RankAction, SessionFacade};
use crate::ports::audit_log::AuditEvent;
use consent_domain::approval::CLUSTER_SOURCE;
use consent_domain::{ApprovedText, GoalBoard, GoalCluster, QuestionType, SessionHandle, SubStepStatus, Topic};
use serde_json::json;
use tracing::{debug, info};

impl SessionFacade {
    /// Start a fresh board from clustered goals, replacing any earlier board
    pub fn init_goal_board(
        &self,
        handle: &SessionHandle,
        clusters: Vec<GoalCluster>,
    ) -> Result<GoalBoard, FacadeError> {
        let board = GoalBoard::new(clusters, self.params.top_n);
        let stored = board.clone();
        self.update_flow_state(handle, |state| {
            let doelen = state.sub_step_mut(Topic::Doelen);
            doelen.begin_analysis();
            doelen.goal_board = Some(stored);
            Ok(())
        })?;
        info!("Initialised goal board with {} clusters", board.clusters.len());
        Ok(board)
    }

    pub fn goal_board(&self, handle: &SessionHandle) -> Result<GoalBoard, FacadeError> {
        self.flow_state(handle)?
            .sub_step(Topic::Doelen)
            .goal_board
            .clone()
            .ok_or(FacadeError::NoGoalBoard)
    }

    fn with_goal_board<R>(
        &self,
        handle: &SessionHandle,
        change: impl FnOnce(&mut GoalBoard) -> Result<R, FacadeError>,
    ) -> Result<R, FacadeError> {
        self.update_flow_state(handle, |state| {
            let board = state
                .sub_step_mut(Topic::Doelen)
                .goal_board
                .as_mut()
                .ok_or(FacadeError::NoGoalBoard)?;
            change(board)
        })
    }

    /// Keep only the selected clusters on the board; an empty selection keeps all
    pub fn select_goal_clusters(&self, handle: &SessionHandle, cluster_ids: &[String]) -> Result<GoalBoard, FacadeError> {
        self.with_goal_board(handle, |board| {
            board.select_for_voting(cluster_ids);
            let dropped: Vec<String> = board
                .ranking
                .entries()
                .iter()
                .filter(|id| board.cluster(id).is_none())
                .cloned()
                .collect();
            for id in dropped {
                board.ranking.remove(&id);
            }
            Ok(board.clone())
        })
    }

    pub fn rename_goal_cluster(&self, handle: &SessionHandle, cluster_id: &str, name: &str) -> Result<(), FacadeError> {
        self.with_goal_board(handle, |board| {
            if board.rename_cluster(cluster_id, name.trim()) {
                Ok(())
            } else {
                Err(FacadeError::ClusterNotFound(cluster_id.to_string()))
            }
        })
    }

    // ==================== Dot voting ====================

    /// Give one dot to a cluster. Returns `false` when the voter's budget is spent.
    ///
    /// A submitted ballot can no longer change.
    pub fn add_dot(&self, handle: &SessionHandle, voter: &str, cluster_id: &str) -> Result<bool, FacadeError> {
        let budget = self.params.dot_budget;
        self.with_goal_board(handle, |board| {
            require_cluster(board, cluster_id)?;
            require_open_ballot(board, voter)?;
            let added = board.ballot_mut(voter, budget).add_point(cluster_id);
            board.apply_tally();
            Ok(added)
        })
    }

    /// Take one dot back. Returns `false` when the voter had none on the cluster.
    pub fn remove_dot(&self, handle: &SessionHandle, voter: &str, cluster_id: &str) -> Result<bool, FacadeError> {
        let budget = self.params.dot_budget;
        self.with_goal_board(handle, |board| {
            require_cluster(board, cluster_id)?;
            require_open_ballot(board, voter)?;
            let removed = board.ballot_mut(voter, budget).remove_point(cluster_id);
            board.apply_tally();
            Ok(removed)
        })
    }

    /// Hand in a voter's ballot and refresh the cluster totals
    pub fn submit_ballot(&self, handle: &SessionHandle, voter: &str) -> Result<GoalBoard, FacadeError> {
        let budget = self.params.dot_budget;
        let board = self.update_flow_state(handle, |state| {
            let doelen = state.sub_step_mut(Topic::Doelen);
            let board = doelen.goal_board.as_mut().ok_or(FacadeError::NoGoalBoard)?;
            board.ballot_mut(voter, budget).submit();
            board.apply_tally();
            let board = board.clone();
            doelen.advance_to(SubStepStatus::Voting);
            Ok(board)
        })?;
        debug!("Ballot of {} submitted", voter);
        self.audit.log(AuditEvent::new(
            "dot_ballot_submitted",
            json!({ "session_id": handle.id(), "voter": voter }),
        ));
        Ok(board)
    }

    // ==================== Ranking ====================

    /// Apply a ranking action. Returns `false` if it changed nothing.
    pub fn rank_goal(&self, handle: &SessionHandle, action: RankAction) -> Result<bool, FacadeError> {
        self.with_goal_board(handle, |board| {
            let changed = match &action {
                RankAction::Add(id) => {
                    require_cluster(board, id)?;
                    board.ranking.add(id.as_str())
                }
                RankAction::Remove(id) => board.ranking.remove(id),
                RankAction::MoveUp(id) => board.ranking.move_up(id),
                RankAction::MoveDown(id) => board.ranking.move_down(id),
                RankAction::MoveOnto { cluster, target } => board.ranking.move_onto(cluster, target),
            };
            Ok(changed)
        })
    }

    /// Override the wording a ranked cluster will be approved with
    pub fn set_goal_formulation(&self, handle: &SessionHandle, cluster_id: &str, text: &str) -> Result<(), FacadeError> {
        self.with_goal_board(handle, |board| {
            require_cluster(board, cluster_id)?;
            board.set_formulation(cluster_id, text.trim());
            Ok(())
        })
    }

    /// Approve the ranking: rank k becomes the approved text of `goal_k`.
    ///
    /// Goal texts beyond a shorter ranking are removed so a re-approval never
    /// leaves a stale goal behind.
    pub fn approve_goal_ranking(&self, handle: &SessionHandle) -> Result<Vec<ApprovedText>, FacadeError> {
        let goals = self.goal_board(handle)?.goal_texts()?;

        for question in QuestionType::GOALS.iter().skip(goals.len()) {
            if self.remove_approved_text(handle, *question)? {
                debug!("Removed stale {}", question);
            }
        }

        let mut approved = Vec::with_capacity(goals.len());
        for (question, cluster_id, text) in &goals {
            approved.push(self.save_approved_text(handle, *question, text, CLUSTER_SOURCE, cluster_id)?);
        }

        info!("Approved {} goals for session {}", approved.len(), handle);
        self.audit.log(AuditEvent::new(
            "goals_approved",
            json!({
                "session_id": handle.id(),
                "clusters": goals.iter().map(|(_, id, _)| id.as_str()).collect::<Vec<_>>(),
            }),
        ));
        Ok(approved)
    }
}

fn require_cluster(board: &GoalBoard, cluster_id: &str) -> Result<(), FacadeError> {
    match board.cluster(cluster_id) {
        Some(_) => Ok(()),
        None => Err(FacadeError::ClusterNotFound(cluster_id.to_string())),
    }
}

fn require_open_ballot(board: &GoalBoard, voter: &str) -> Result<(), FacadeError> {
    if board.ballots.iter().any(|b| b.voter == voter && b.is_submitted()) {
        return Err(FacadeError::BallotSubmitted(voter.to_string()));
    }
    Ok(())
}
