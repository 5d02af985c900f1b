//! Server state: the explicitly constructed core service shared by every handler.

use std::sync::Arc;

use scoreline_shared::time::Clock;

use crate::{
    domain::{ConnectionRegistry, GroupLimits, GroupStateRepository, MessagePusher, Timer},
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryConnectionRegistry, InMemoryGroupStateRepository},
    },
    usecase::{
        AreClientsConnectedUseCase, BroadcastDispatcher, ConnectClientUseCase, CounterUseCase,
        DisconnectClientUseCase, GetGroupsUseCase, GroupLifecycleManager, JoinGroupUseCase,
        LeaveGroupUseCase, UpdateGroupStateUseCase,
    },
};

/// Shared application state
pub struct AppState {
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    pub join_group_usecase: Arc<JoinGroupUseCase>,
    pub leave_group_usecase: Arc<LeaveGroupUseCase>,
    pub update_group_state_usecase: Arc<UpdateGroupStateUseCase>,
    pub are_clients_connected_usecase: Arc<AreClientsConnectedUseCase>,
    pub counter_usecase: Arc<CounterUseCase>,
    pub get_groups_usecase: Arc<GetGroupsUseCase>,
    /// Group Lifecycle Manager（定期回収タスクの起動に使う）
    pub lifecycle: Arc<GroupLifecycleManager>,
}

impl AppState {
    /// Wire every use case on top of the given registry, store and pusher.
    pub fn new(
        groups: Arc<dyn GroupStateRepository>,
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        limits: GroupLimits,
    ) -> Self {
        let lifecycle = Arc::new(GroupLifecycleManager::new(
            groups.clone(),
            registry.clone(),
            clock,
            limits,
        ));
        let dispatcher = Arc::new(BroadcastDispatcher::new(
            registry.clone(),
            message_pusher.clone(),
        ));

        Self {
            connect_client_usecase: Arc::new(ConnectClientUseCase::new(message_pusher.clone())),
            disconnect_client_usecase: Arc::new(DisconnectClientUseCase::new(
                registry.clone(),
                message_pusher,
            )),
            join_group_usecase: Arc::new(JoinGroupUseCase::new(
                groups.clone(),
                registry.clone(),
                lifecycle.clone(),
                dispatcher.clone(),
            )),
            leave_group_usecase: Arc::new(LeaveGroupUseCase::new(registry.clone())),
            update_group_state_usecase: Arc::new(UpdateGroupStateUseCase::new(
                groups.clone(),
                dispatcher.clone(),
            )),
            are_clients_connected_usecase: Arc::new(AreClientsConnectedUseCase::new(
                registry.clone(),
                dispatcher.clone(),
            )),
            counter_usecase: Arc::new(CounterUseCase::new(dispatcher)),
            get_groups_usecase: Arc::new(GetGroupsUseCase::new(groups, registry)),
            lifecycle,
        }
    }

    /// In-memory wiring: all state lives in process memory and is lost on restart.
    pub fn in_memory(clock: Arc<dyn Clock>, limits: GroupLimits, initial_timer: Timer) -> Self {
        Self::new(
            Arc::new(InMemoryGroupStateRepository::new(initial_timer)),
            Arc::new(InMemoryConnectionRegistry::new()),
            Arc::new(WebSocketMessagePusher::default()),
            clock,
            limits,
        )
    }
}
